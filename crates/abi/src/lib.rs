//! ABI encoding of contract calls, with a pluggable process-wide encoder.

pub mod encoder;
pub mod error;
pub mod function;

pub use encoder::{
    encode, encode_constructor, encoder, install_provider, DefaultFunctionEncoder,
    FunctionEncoder, FunctionEncoderProvider,
};
pub use error::AbiError;
pub use function::Function;
