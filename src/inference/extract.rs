use serde::Deserialize;
use serde_json::Value;

use super::types::{DrugDetail, MedicationSummary, Prescription};

/// Typed view of the gateway's nested medication shape. Every field is
/// optional with explicit defaults so a partially populated record still
/// yields whatever it does carry.
#[derive(Deserialize, Default)]
struct RawMedicationData {
    #[serde(rename = "PrescriptionData", default)]
    prescription_data: Vec<Value>,
}

#[derive(Deserialize, Default)]
struct RawPrescription {
    #[serde(rename = "JinRyoGaesiIl", default)]
    treatment_date: Option<String>,
    #[serde(rename = "MedicationDetails", default)]
    medication_details: Vec<Value>,
}

#[derive(Deserialize, Default)]
struct RawMedicationDetail {
    #[serde(rename = "ChoBangYakPumMyung", default)]
    drug_name: Option<String>,
    #[serde(rename = "ChoBangYakPumHyoneung", default)]
    drug_effect: Option<String>,
    #[serde(rename = "TuyakIlSoo", default)]
    dosage_days: Option<Value>,
    #[serde(rename = "DrugDetailInfo", default)]
    drug_detail_info: Option<RawDrugDetailInfo>,
}

#[derive(Deserialize, Default)]
struct RawDrugDetailInfo {
    #[serde(rename = "CmpnInfo", default)]
    ingredient: Option<String>,
    #[serde(rename = "AtcInfo", default)]
    atc_class: Option<String>,
    #[serde(rename = "KpicInfo", default)]
    kpic_class: Option<String>,
}

/// Extract the structured medication summary from the aggregated medication
/// payload. Malformed or missing nested shapes degrade to an empty summary
/// (or skip the offending item) — extraction never fails.
pub fn extract_medication_summary(medication_data: &Value) -> MedicationSummary {
    let raw: RawMedicationData =
        serde_json::from_value(medication_data.clone()).unwrap_or_default();

    let mut summary = MedicationSummary::default();

    for prescription_value in raw.prescription_data {
        let Ok(raw_prescription) = serde_json::from_value::<RawPrescription>(prescription_value)
        else {
            continue;
        };

        let mut drugs = Vec::new();
        for detail_value in raw_prescription.medication_details {
            let Ok(detail) = serde_json::from_value::<RawMedicationDetail>(detail_value) else {
                continue;
            };
            let Some(name) = detail.drug_name.filter(|n| !n.trim().is_empty()) else {
                continue;
            };
            let name = name.trim().to_string();

            if !summary.drug_names.contains(&name) {
                summary.drug_names.push(name.clone());
            }

            let info = detail.drug_detail_info.unwrap_or_default();
            drugs.push(DrugDetail {
                name,
                effect: detail.drug_effect,
                dosage_days: detail.dosage_days.as_ref().map(value_to_text),
                ingredient: info.ingredient,
                atc_class: info.atc_class,
                kpic_class: info.kpic_class,
            });
        }

        summary.prescriptions.push(Prescription {
            date: raw_prescription.treatment_date,
            drugs,
        });
    }

    summary
}

// The gateway is inconsistent about numeric fields, sometimes a string and
// sometimes a bare number.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
