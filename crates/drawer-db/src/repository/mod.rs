//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  drawer-sync gateway / billing                                          │
//! │       │                                                                 │
//! │       │  db.documents().save(key, &doc, device)                         │
//! │       │  db.accounts().set_tier(user, tier)                             │
//! │       ▼                                                                 │
//! │  DocumentRepository          AccountRepository                          │
//! │  ├── load                    ├── get / ensure_account                   │
//! │  ├── save (newest wins)      ├── set_tier                               │
//! │  └── delete                  ├── link_customer / find_by_customer       │
//! │                              └── delete                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod account;
pub mod document;
