/// Errors raised by function encoding and encoder selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// An argument has no Solidity type name, e.g. an empty dynamic array.
    #[error("argument {index} of `{function}` has no solidity type name")]
    UnnamedType {
        /// Function being encoded, `constructor` for constructor arguments.
        function: String,
        /// Position of the argument.
        index: usize,
    },
    /// Type strings and argument strings differ in number.
    #[error("`{function}` declares {types} argument types but got {args} values")]
    ArgumentCountMismatch {
        /// Function being parsed.
        function: String,
        /// Number of type strings.
        types: usize,
        /// Number of argument strings.
        args: usize,
    },
    /// A type string does not parse, or its argument does not coerce to it.
    #[error("argument {index} of `{function}`: {reason}")]
    InvalidArgument {
        /// Function being parsed.
        function: String,
        /// Position of the argument.
        index: usize,
        /// Parser message.
        reason: String,
    },
    /// A provider was installed already.
    #[error("a function encoder provider is already installed")]
    ProviderAlreadyInstalled,
    /// The active encoder was chosen already and can no longer change.
    #[error("function encoder selection is sealed")]
    SelectionSealed,
}
