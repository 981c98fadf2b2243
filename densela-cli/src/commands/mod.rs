pub mod convert;
pub mod det;
pub mod inv;
pub mod lssolve;
pub mod qr;
pub mod solve;
pub mod stats;
