use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Selector};

use crate::error::AbiError;

/// A contract call: function name and argument values.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Name without the argument list.
    pub name: String,
    /// Argument values, in order.
    pub inputs: Vec<DynSolValue>,
}

impl Function {
    pub fn new(name: impl Into<String>, inputs: Vec<DynSolValue>) -> Self {
        Self { name: name.into(), inputs }
    }

    /// Builds a call from Solidity type strings and their textual arguments, e.g.
    /// `Function::parse("transfer", &["address", "uint256"], &["0x7b65...", "10"])`.
    pub fn parse(
        name: impl Into<String>,
        types: &[&str],
        args: &[&str],
    ) -> Result<Self, AbiError> {
        let name = name.into();
        if types.len() != args.len() {
            return Err(AbiError::ArgumentCountMismatch {
                function: name,
                types: types.len(),
                args: args.len(),
            });
        }
        let inputs = types
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (ty, arg))| {
                DynSolType::parse(ty).and_then(|ty| ty.coerce_str(arg)).map_err(|err| {
                    AbiError::InvalidArgument { function: name.clone(), index, reason: err.to_string() }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, inputs })
    }

    /// `name(type1,type2,...)`.
    pub fn method_signature(&self) -> Result<String, AbiError> {
        let types = input_types(&self.name, &self.inputs)?;
        Ok(format!("{}({})", self.name, types.join(",")))
    }

    /// First four bytes of the keccak hash of [`Self::method_signature`].
    pub fn method_id(&self) -> Result<Selector, AbiError> {
        let signature = self.method_signature()?;
        Ok(Selector::from_slice(&keccak256(signature.as_bytes())[..4]))
    }
}

pub(crate) fn input_types(function: &str, inputs: &[DynSolValue]) -> Result<Vec<String>, AbiError> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .sol_type_name()
                .map(|name| name.into_owned())
                .ok_or_else(|| AbiError::UnnamedType { function: function.to_string(), index })
        })
        .collect()
}
