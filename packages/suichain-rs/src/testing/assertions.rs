//! Programmable Transaction Assertions
//!
//! Structural checks over built transactions: which commands exist, what
//! their arguments resolve to. Each returns `eyre::Result` so tests can `?`
//! through them and get a readable mismatch message.

use eyre::{eyre, Result};

use crate::address::SuiAddress;
use crate::transaction::{
    Argument, CallArg, Command, ObjectArg, ProgrammableMoveCall, ProgrammableTransaction,
};
use crate::types::{SUI_CLOCK_OBJECT_ID, SUI_CLOCK_OBJECT_SHARED_VERSION};

/// Assert exactly one `SplitCoins` from the gas coin with a single amount;
/// returns the argument referring to the split coin
pub fn assert_single_split_from_gas(pt: &ProgrammableTransaction, amount: u64) -> Result<Argument> {
    let splits: Vec<(usize, &Argument, &Vec<Argument>)> = pt
        .commands
        .iter()
        .enumerate()
        .filter_map(|(i, c)| match c {
            Command::SplitCoins(coin, amounts) => Some((i, coin, amounts)),
            _ => None,
        })
        .collect();

    let [(index, coin, amounts)] = splits.as_slice() else {
        return Err(eyre!("Expected exactly one SplitCoins, found {}", splits.len()));
    };

    if **coin != Argument::GasCoin {
        return Err(eyre!("SplitCoins source is {:?}, expected GasCoin", coin));
    }

    let [amount_arg] = amounts.as_slice() else {
        return Err(eyre!("Expected one split amount, found {}", amounts.len()));
    };

    let actual = pure_u64(pt, *amount_arg)?;
    if actual != amount {
        return Err(eyre!("Split amount mismatch: expected {}, got {}", amount, actual));
    }

    Ok(Argument::NestedResult(*index as u16, 0))
}

/// Assert exactly one Move call in total, to `module::function`
pub fn assert_single_move_call<'a>(
    pt: &'a ProgrammableTransaction,
    module: &str,
    function: &str,
) -> Result<&'a ProgrammableMoveCall> {
    let calls: Vec<&ProgrammableMoveCall> = pt.move_calls().collect();

    let [call] = calls.as_slice() else {
        return Err(eyre!("Expected exactly one MoveCall, found {}", calls.len()));
    };

    if call.module != module || call.function != function {
        return Err(eyre!(
            "MoveCall target mismatch: expected {}::{}, got {}::{}",
            module,
            function,
            call.module,
            call.function
        ));
    }

    Ok(call)
}

/// Decode a pure `u64` argument
pub fn pure_u64(pt: &ProgrammableTransaction, argument: Argument) -> Result<u64> {
    let bytes = pure_bytes(pt, argument)?;
    let raw: [u8; 8] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| eyre!("Pure u64 must be 8 bytes, got {}", bytes.len()))?;
    Ok(u64::from_le_bytes(raw))
}

/// Decode a pure address argument
pub fn pure_address(pt: &ProgrammableTransaction, argument: Argument) -> Result<SuiAddress> {
    let bytes = pure_bytes(pt, argument)?;
    SuiAddress::from_bytes(bytes)
}

/// Assert the argument is the read-only shared clock
pub fn assert_clock_argument(pt: &ProgrammableTransaction, argument: Argument) -> Result<()> {
    match pt.input(argument) {
        Some(CallArg::Object(ObjectArg::SharedObject {
            id,
            initial_shared_version,
            mutable,
        })) if *id == SUI_CLOCK_OBJECT_ID
            && *initial_shared_version == SUI_CLOCK_OBJECT_SHARED_VERSION
            && !*mutable =>
        {
            Ok(())
        }
        other => Err(eyre!("Expected read-only clock object, got {:?}", other)),
    }
}

fn pure_bytes(pt: &ProgrammableTransaction, argument: Argument) -> Result<&Vec<u8>> {
    match pt.input(argument) {
        Some(CallArg::Pure(bytes)) => Ok(bytes),
        other => Err(eyre!("Expected pure input for {:?}, got {:?}", argument, other)),
    }
}
