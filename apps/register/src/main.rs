//! # Parada Caribe Register Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Parada Caribe Register                           │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │                      Front end                                   │   │
//! │  │  • Menu grid            • Current order                          │   │
//! │  │  • Cash drawer          • Inventory and recipes                  │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                     │ JSON lines (stdin)     ▲ JSON lines (stdout)      │
//! │                     ▼                        │                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │                    Rust Backend (this crate)                     │   │
//! │  │  lib.rs ─────► logging, config, database, serve loop             │   │
//! │  │  commands/ ──► add_to_order, checkout, prepare_recipe, ...       │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │                         SQLite Database                          │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup lives in lib.rs so tests can drive the same code
    caribe_register::run().await
}
