pub mod components;
pub mod error;
pub mod frame;
pub mod logging;
pub mod mapper;
pub mod prelude;
pub mod session;
pub mod table;
#[allow(unused_imports)]
pub(crate) use anyhow::{anyhow, bail, Result};
pub use prelude::*;
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn, Level};

pub use llm_generate;
