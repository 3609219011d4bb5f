//! System Definitions (ABI).
//!
//! Contém os códigos de retorno que o firmware devolve ao SO (OPAL) e os
//! erros internos do SLW.

pub mod error;

pub use error::{ImageError, OpalStatus, SlwError, XscomError};
