//! Route table, navigation guard, and the navigator that applies decisions.
//!
//! DESIGN
//! ======
//! The route table is data, the guard is a pure async decision over live
//! identity state, and the navigator owns the only mutable piece (the current
//! path and a ticket for discarding superseded decisions).

pub mod guard;
pub mod navigator;
pub mod table;
