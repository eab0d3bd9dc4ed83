use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "SUCCESS";
pub const STATUS_PARTIAL_SUCCESS: &str = "PARTIAL_SUCCESS";
pub const STATUS_ERROR: &str = "ERROR";

pub const RISK_LOW: &str = "LOW";
pub const RISK_MEDIUM: &str = "MEDIUM";
pub const RISK_UNKNOWN: &str = "UNKNOWN";

/// Placeholder probability label: the classifier abstains from per-disease
/// confidence, so every accepted disease is marked "estimated".
const PROBABILITY_ESTIMATED: &str = "추정";
const REASON_PRESCRIPTION_PATTERN: &str = "처방 패턴 분석 결과";

/// One drug entry of a prescription, flattened from the gateway's nested
/// medication shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugDetail {
    pub name: String,
    pub effect: Option<String>,
    pub dosage_days: Option<String>,
    pub ingredient: Option<String>,
    pub atc_class: Option<String>,
    pub kpic_class: Option<String>,
}

/// One prescription event: a treatment date plus its drug entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub date: Option<String>,
    pub drugs: Vec<DrugDetail>,
}

/// Derived, non-persisted view of the filtered medication data: ordered
/// prescriptions plus drug names deduplicated by first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationSummary {
    pub prescriptions: Vec<Prescription>,
    pub drug_names: Vec<String>,
}

impl MedicationSummary {
    pub fn is_empty(&self) -> bool {
        self.prescriptions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedDisease {
    pub disease_name: String,
    pub probability: String,
    pub reason: String,
    /// Always empty: the pipeline does not attempt per-disease medication
    /// attribution even though extracted drug names are available.
    pub related_medications: Vec<String>,
}

/// Terminal outcome of the inference pipeline. Always well-formed; callers
/// distinguish outcomes via `status`, never via errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisReport {
    pub status: String,
    pub message: String,
    pub predicted_diseases: Vec<PredictedDisease>,
    pub analysis_reason: Option<String>,
    pub recommendations: Vec<String>,
    /// `LOW` iff no disease was accepted, else `MEDIUM`; `UNKNOWN` on
    /// degraded paths. `HIGH` is reserved and never produced here.
    pub risk_level: String,
}

impl DiagnosisReport {
    pub fn success(disease_names: Vec<String>) -> Self {
        let predicted_diseases: Vec<PredictedDisease> = disease_names
            .into_iter()
            .map(|name| PredictedDisease {
                disease_name: name,
                probability: PROBABILITY_ESTIMATED.into(),
                reason: REASON_PRESCRIPTION_PATTERN.into(),
                related_medications: Vec::new(),
            })
            .collect();

        let risk_level = if predicted_diseases.is_empty() {
            RISK_LOW
        } else {
            RISK_MEDIUM
        };

        Self {
            status: STATUS_SUCCESS.into(),
            message: "기저질환 분석이 완료되었습니다.".into(),
            predicted_diseases,
            analysis_reason: Some("처방 데이터 패턴 분석을 통한 기저질환 추정".into()),
            recommendations: vec!["의료진과 상담 권장".into(), "정기적인 건강검진".into()],
            risk_level: risk_level.into(),
        }
    }

    /// Collaborator unreachable or response unusable.
    pub fn error(message: String) -> Self {
        Self {
            status: STATUS_ERROR.into(),
            message,
            predicted_diseases: Vec::new(),
            analysis_reason: None,
            recommendations: Vec::new(),
            risk_level: RISK_UNKNOWN.into(),
        }
    }

    /// The collaborator answered but its output could not be parsed.
    pub fn partial(message: String) -> Self {
        Self {
            status: STATUS_PARTIAL_SUCCESS.into(),
            message,
            predicted_diseases: Vec::new(),
            analysis_reason: None,
            recommendations: Vec::new(),
            risk_level: RISK_UNKNOWN.into(),
        }
    }
}
