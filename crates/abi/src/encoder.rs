//! Selection of the process-wide [`FunctionEncoder`].
//!
//! An application may install one [`FunctionEncoderProvider`] at startup. The first call to
//! [`encoder`] picks the provider's encoder, or [`DefaultFunctionEncoder`] when none is
//! installed, and keeps that choice for the rest of the process.

use std::{fmt, sync::OnceLock};

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::Bytes;
use parking_lot::{const_mutex, Mutex};
use tracing::debug;

use crate::{
    error::AbiError,
    function::{input_types, Function},
};

/// Turns calls and constructor arguments into ABI bytes.
pub trait FunctionEncoder: fmt::Debug + Send + Sync {
    /// Selector followed by the encoded arguments.
    fn encode_function(&self, function: &Function) -> Result<Bytes, AbiError>;

    /// Encoded arguments without a selector.
    fn encode_parameters(&self, params: &[DynSolValue]) -> Result<Bytes, AbiError>;
}

/// Supplies the encoder to use instead of [`DefaultFunctionEncoder`].
pub trait FunctionEncoderProvider: Send + Sync {
    fn get(&self) -> Box<dyn FunctionEncoder>;
}

/// Standard Solidity ABI encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFunctionEncoder;

impl FunctionEncoder for DefaultFunctionEncoder {
    fn encode_function(&self, function: &Function) -> Result<Bytes, AbiError> {
        let selector = function.method_id()?;
        let params = encode_params(&function.inputs);
        let mut out = Vec::with_capacity(selector.len() + params.len());
        out.extend_from_slice(selector.as_slice());
        out.extend_from_slice(&params);
        Ok(out.into())
    }

    fn encode_parameters(&self, params: &[DynSolValue]) -> Result<Bytes, AbiError> {
        input_types("constructor", params)?;
        Ok(encode_params(params).into())
    }
}

fn encode_params(params: &[DynSolValue]) -> Vec<u8> {
    DynSolValue::Tuple(params.to_vec()).abi_encode_params()
}

struct Selection {
    provider: Option<Box<dyn FunctionEncoderProvider>>,
    sealed: bool,
}

static SELECTION: Mutex<Selection> = const_mutex(Selection { provider: None, sealed: false });
static ENCODER: OnceLock<Box<dyn FunctionEncoder>> = OnceLock::new();

/// Installs `provider` as the source of the active encoder.
///
/// Must run before the first call to [`encoder`]. Afterwards it fails with
/// [`AbiError::SelectionSealed`]; a second install fails with
/// [`AbiError::ProviderAlreadyInstalled`].
pub fn install_provider(provider: impl FunctionEncoderProvider + 'static) -> Result<(), AbiError> {
    let mut selection = SELECTION.lock();
    if selection.sealed {
        return Err(AbiError::SelectionSealed);
    }
    if selection.provider.is_some() {
        return Err(AbiError::ProviderAlreadyInstalled);
    }
    selection.provider = Some(Box::new(provider));
    Ok(())
}

/// The active encoder, chosen on first call.
///
/// Concurrent first calls all observe the same instance.
pub fn encoder() -> &'static dyn FunctionEncoder {
    ENCODER
        .get_or_init(|| {
            let mut selection = SELECTION.lock();
            selection.sealed = true;
            match selection.provider.take() {
                Some(provider) => {
                    let encoder = provider.get();
                    debug!(target: "klay::abi", ?encoder, "Selected installed function encoder");
                    encoder
                }
                None => {
                    debug!(target: "klay::abi", "Selected default function encoder");
                    Box::new(DefaultFunctionEncoder)
                }
            }
        })
        .as_ref()
}

/// Encodes a call through the active encoder.
pub fn encode(function: &Function) -> Result<Bytes, AbiError> {
    encoder().encode_function(function)
}

/// Encodes constructor arguments through the active encoder.
pub fn encode_constructor(params: &[DynSolValue]) -> Result<Bytes, AbiError> {
    encoder().encode_parameters(params)
}
