//! Two self-contained numerical exercises behind one library:
//! a dense forward-pass micro-benchmark and a tabular Q-learning
//! trainer for a fixed frozen-lake grid.

pub mod bench;
pub mod lake;
pub mod linalg;
pub mod mlp;
pub mod policy;
pub mod qlearn;
