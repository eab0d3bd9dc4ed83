use serde_json::Value;

/// Treatment-type discriminator for prescription dispensing. Only records of
/// this type are relevant to the inference step; visits, injections and other
/// treatment types are dropped.
pub const PRESCRIPTION_DISPENSING: &str = "처방조제";

/// Keep only prescription-dispensing entries in the response's `ResultList`,
/// replacing the list in place. A payload without the expected shape passes
/// through untouched rather than failing the aggregate. Idempotent.
pub fn filter_prescription_records(mut data: Value) -> Value {
    let Some(list) = data.get_mut("ResultList").and_then(Value::as_array_mut) else {
        return data;
    };

    let before = list.len();
    list.retain(|record| {
        record.get("JinRyoHyungTae").and_then(Value::as_str) == Some(PRESCRIPTION_DISPENSING)
    });
    tracing::debug!(
        kept = list.len(),
        dropped = before - list.len(),
        "filtered medication records to prescription dispensing"
    );

    data
}
