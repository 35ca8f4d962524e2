//! Programmable Transactions
//!
//! Types and a builder for Sui programmable transaction blocks (PTBs). The
//! enums below are serialized with BCS exactly as the chain expects, so
//! variant order is part of the wire format and must not change.
//!
//! ## Builder
//!
//! [`ProgrammableTransactionBuilder`] mirrors the wallet SDK's transaction
//! builder: inputs are appended as they are referenced, commands return
//! [`Argument`]s that later commands can consume.
//!
//! ```ignore
//! let mut ptb = ProgrammableTransactionBuilder::new();
//! let amount = ptb.pure_u64(100)?;
//! let coin = ptb.split_coin(Argument::GasCoin, amount);
//! ptb.transfer_objects(vec![coin], ptb.pure_address(recipient)?);
//! let pt = ptb.finish();
//! ```

use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::address::{ObjectId, SuiAddress};
use crate::hash;
use crate::types::{
    Digest, ObjectRef, SequenceNumber, SUI_CLOCK_OBJECT_ID, SUI_CLOCK_OBJECT_SHARED_VERSION,
};

// ============================================================================
// Inputs and arguments
// ============================================================================

/// A transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// BCS-encoded pure value
    Pure(Vec<u8>),
    /// Object input
    Object(ObjectArg),
}

/// How an object is passed into a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectArg {
    /// Owned or immutable object, pinned to a version
    ImmOrOwnedObject(ObjectRef),
    /// Shared object, identified by its initial shared version
    SharedObject {
        id: ObjectId,
        initial_shared_version: SequenceNumber,
        mutable: bool,
    },
}

impl ObjectArg {
    /// The shared clock, passed read-only
    pub fn clock() -> Self {
        ObjectArg::SharedObject {
            id: SUI_CLOCK_OBJECT_ID,
            initial_shared_version: SUI_CLOCK_OBJECT_SHARED_VERSION,
            mutable: false,
        }
    }

    /// Id of the referenced object
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectArg::ImmOrOwnedObject(obj) => obj.object_id,
            ObjectArg::SharedObject { id, .. } => *id,
        }
    }
}

/// A reference to a value available to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    /// The gas coin of the transaction
    GasCoin,
    /// One of the transaction inputs
    Input(u16),
    /// The single result of a previous command
    Result(u16),
    /// One result of a previous command that returned several
    NestedResult(u16, u16),
}

// ============================================================================
// Types
// ============================================================================

/// Move type tag, used for type arguments of Move calls
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

/// Fully qualified Move struct type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::U256 => f.write_str("u256"),
            TypeTag::Address => f.write_str("address"),
            TypeTag::Signer => f.write_str("signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => {
                write!(f, "{}::{}::{}", tag.address.to_short_hex(), tag.module, tag.name)?;
                if !tag.type_params.is_empty() {
                    let params: Vec<String> =
                        tag.type_params.iter().map(|p| p.to_string()).collect();
                    write!(f, "<{}>", params.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// A Move function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

impl ProgrammableMoveCall {
    /// `package::module::function` of this call
    pub fn target(&self) -> MoveTarget {
        MoveTarget {
            package: self.package,
            module: self.module.clone(),
            function: self.function.clone(),
        }
    }
}

/// A single PTB command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    TransferObjects(Vec<Argument>, Argument),
    SplitCoins(Argument, Vec<Argument>),
}

/// Inputs plus the commands consuming them
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl ProgrammableTransaction {
    /// All Move calls, in command order
    pub fn move_calls(&self) -> impl Iterator<Item = &ProgrammableMoveCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::MoveCall(call) => Some(call.as_ref()),
            _ => None,
        })
    }

    /// Resolve an `Input` argument to its call arg
    pub fn input(&self, argument: Argument) -> Option<&CallArg> {
        match argument {
            Argument::Input(i) => self.inputs.get(i as usize),
            _ => None,
        }
    }
}

// ============================================================================
// Move call target
// ============================================================================

/// A `package::module::function` entry point
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveTarget {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
}

impl MoveTarget {
    /// Create a target, validating module and function identifiers
    pub fn new(package: ObjectId, module: &str, function: &str) -> Result<Self> {
        validate_identifier(module).wrap_err("Invalid module name")?;
        validate_identifier(function).wrap_err("Invalid function name")?;
        Ok(Self {
            package,
            module: module.to_string(),
            function: function.to_string(),
        })
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

impl FromStr for MoveTarget {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split("::").collect();
        match parts.as_slice() {
            [package, module, function] => {
                let package = SuiAddress::from_hex(package)?;
                Self::new(package, module, function)
            }
            _ => Err(eyre!(
                "Move target must look like <package>::<module>::<function>, got '{}'",
                s
            )),
        }
    }
}

/// Check that a string is a valid Move identifier
pub fn validate_identifier(ident: &str) -> Result<()> {
    let mut chars = ident.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        // A lone underscore is not an identifier
        Some('_') => {
            ident.len() > 1 && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(eyre!("'{}' is not a valid Move identifier", ident))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Incremental PTB builder
#[derive(Debug, Clone, Default)]
pub struct ProgrammableTransactionBuilder {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

impl ProgrammableTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gas coin
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    /// Add a pure input from any BCS-serializable value
    pub fn pure<T: Serialize>(&mut self, value: &T) -> Result<Argument> {
        let bytes = bcs::to_bytes(value).wrap_err("Failed to BCS-encode pure argument")?;
        self.pure_bytes(bytes)
    }

    /// Add a pure input from already-encoded bytes
    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> Result<Argument> {
        self.push_input(CallArg::Pure(bytes))
    }

    pub fn pure_u64(&mut self, value: u64) -> Result<Argument> {
        self.pure_bytes(value.to_le_bytes().to_vec())
    }

    pub fn pure_address(&mut self, address: SuiAddress) -> Result<Argument> {
        self.pure_bytes(address.as_bytes().to_vec())
    }

    /// Add an object input.
    ///
    /// An object referenced twice shares one input. A shared object passed
    /// both read-only and mutably is upgraded to mutable.
    pub fn object(&mut self, arg: ObjectArg) -> Result<Argument> {
        let id = arg.id();
        let existing = self.inputs.iter().position(|input| {
            matches!(input, CallArg::Object(obj) if obj.id() == id)
        });

        let Some(index) = existing else {
            return self.push_input(CallArg::Object(arg));
        };

        let CallArg::Object(current) = &mut self.inputs[index] else {
            return Err(eyre!("Input {} is not an object", index));
        };

        match (current, arg) {
            (
                ObjectArg::SharedObject {
                    initial_shared_version: v1,
                    mutable,
                    ..
                },
                ObjectArg::SharedObject {
                    initial_shared_version: v2,
                    mutable: wants_mutable,
                    ..
                },
            ) if *v1 == v2 => {
                *mutable |= wants_mutable;
            }
            (ObjectArg::ImmOrOwnedObject(r1), ObjectArg::ImmOrOwnedObject(r2)) if *r1 == r2 => {}
            _ => return Err(eyre!("Conflicting inputs for object {}", id)),
        }

        Ok(Argument::Input(index as u16))
    }

    /// Split coins off `coin`, one per amount
    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Vec<Argument> {
        let count = amounts.len();
        let index = self.push_command(Command::SplitCoins(coin, amounts));
        (0..count)
            .map(|i| Argument::NestedResult(index, i as u16))
            .collect()
    }

    /// Split a single coin off `coin`
    pub fn split_coin(&mut self, coin: Argument, amount: Argument) -> Argument {
        let index = self.push_command(Command::SplitCoins(coin, vec![amount]));
        Argument::NestedResult(index, 0)
    }

    /// Call a Move function
    pub fn move_call(
        &mut self,
        target: MoveTarget,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Argument {
        let index = self.push_command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package: target.package,
            module: target.module,
            function: target.function,
            type_arguments,
            arguments,
        })));
        Argument::Result(index)
    }

    /// Transfer objects to a recipient
    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) {
        self.push_command(Command::TransferObjects(objects, recipient));
    }

    /// Finish building
    pub fn finish(self) -> ProgrammableTransaction {
        ProgrammableTransaction {
            inputs: self.inputs,
            commands: self.commands,
        }
    }

    fn push_input(&mut self, arg: CallArg) -> Result<Argument> {
        let index = u16::try_from(self.inputs.len())
            .map_err(|_| eyre!("Too many transaction inputs"))?;
        self.inputs.push(arg);
        Ok(Argument::Input(index))
    }

    fn push_command(&mut self, command: Command) -> u16 {
        self.commands.push(command);
        (self.commands.len() - 1) as u16
    }
}

// ============================================================================
// Transaction data
// ============================================================================

/// What the transaction does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

/// Gas payment and pricing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

/// Epoch-based expiration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExpiration {
    None,
    Epoch(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

/// Unsigned transaction, the payload that gets signed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    /// Build transaction data for a programmable transaction paid by the sender
    pub fn new_programmable(
        sender: SuiAddress,
        gas_payment: Vec<ObjectRef>,
        pt: ProgrammableTransaction,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        TransactionData::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(pt),
            sender,
            gas_data: GasData {
                payment: gas_payment,
                owner: sender,
                price: gas_price,
                budget: gas_budget,
            },
            expiration: TransactionExpiration::None,
        })
    }

    pub fn sender(&self) -> SuiAddress {
        match self {
            TransactionData::V1(v1) => v1.sender,
        }
    }

    pub fn gas_data(&self) -> &GasData {
        match self {
            TransactionData::V1(v1) => &v1.gas_data,
        }
    }

    pub fn kind(&self) -> &TransactionKind {
        match self {
            TransactionData::V1(v1) => &v1.kind,
        }
    }

    /// BCS bytes, the exact bytes that are signed and submitted
    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>> {
        bcs::to_bytes(self).wrap_err("Failed to BCS-encode transaction data")
    }

    /// Transaction digest as computed by the chain
    pub fn digest(&self) -> Result<Digest> {
        Ok(hash::transaction_digest(&self.to_bcs_bytes()?))
    }
}

impl TransactionKind {
    /// BCS bytes of the kind alone, accepted by wallets that resolve gas themselves
    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>> {
        bcs::to_bytes(self).wrap_err("Failed to BCS-encode transaction kind")
    }
}
