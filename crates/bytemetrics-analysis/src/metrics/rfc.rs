//! Response for class.

use bytemetrics_core::types::FxHashSet;

use crate::classfile::DecodedUnit;

/// Size of the union of the declared methods of `units` and the distinct
/// methods their bodies invoke directly.
pub fn response_for_class(units: &[&DecodedUnit]) -> u32 {
    let mut response: FxHashSet<String> = FxHashSet::default();
    for unit in units {
        response.extend(unit.method_ids());
        for body in unit.methods.iter().filter_map(|m| m.body.as_ref()) {
            response.extend(body.invocations.iter().map(|call| call.method_id()));
        }
    }
    response.len() as u32
}
