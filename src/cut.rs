//! Priority-ordered, first-match-wins cut decision arbitration.
//!
//! Grounded directly on `command::arbitration`'s RE-vs-RPC priority
//! `match` and "first match wins" discipline.

use crate::types::CutReason;

/// Inputs considered for a cut decision, evaluated in priority order.
/// Once any is `true`/`Some`, lower-priority inputs are not consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CutInputs {
    pub external_input_active: bool,
    pub remote_cut_requested: bool,
    pub bucket_logic_triggered: bool,
    pub manual_cut_requested: bool,
}

/// Decides whether a cut should fire this tick and, if so, why.
///
/// Priority order: external hardware input, then an authenticated remote
/// (Iridium) command, then the bucket rule engine, then an operator
/// manual command. Stateless — the caller is responsible for only
/// invoking this while the release latch has not already fired.
pub fn decide(inputs: CutInputs) -> Option<CutReason> {
    if inputs.external_input_active {
        return Some(CutReason::ExternalInput);
    }
    if inputs.remote_cut_requested {
        return Some(CutReason::IridiumRemote);
    }
    if inputs.bucket_logic_triggered {
        return Some(CutReason::BucketLogic);
    }
    if inputs.manual_cut_requested {
        return Some(CutReason::Manual);
    }
    None
}
