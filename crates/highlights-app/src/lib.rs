// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod csv;
pub mod filter;
pub mod forms;
pub mod ids;
pub mod model;
pub mod records;
pub mod state;

pub use self::csv::CsvDialect;
pub use filter::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use records::*;
pub use state::*;
