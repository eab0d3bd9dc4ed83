use serde_json::Value;

use super::chat::ChatClient;
use super::extract::extract_medication_summary;
use super::parser::{extract_json_array, parse_disease_names};
use super::prompt::{build_analysis_prompt, ANALYSIS_SYSTEM_PROMPT};
use super::types::DiagnosisReport;

/// Turns filtered medication data into a validated diagnosis report:
/// extract → prompt → chat call → parse. Every failure mode is reported as
/// a status-tagged report; this entry point never raises.
pub struct DiseaseInferencePipeline {
    chat: Box<dyn ChatClient + Send + Sync>,
}

impl DiseaseInferencePipeline {
    pub fn new(chat: Box<dyn ChatClient + Send + Sync>) -> Self {
        Self { chat }
    }

    pub fn infer(&self, medication_data: &Value) -> DiagnosisReport {
        let _span = tracing::info_span!("disease_inference").entered();

        let summary = extract_medication_summary(medication_data);
        tracing::debug!(
            prescriptions = summary.prescriptions.len(),
            drugs = summary.drug_names.len(),
            "extracted medication summary"
        );

        let prompt = build_analysis_prompt(&summary);
        let content = match self.chat.complete(ANALYSIS_SYSTEM_PROMPT, &prompt) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "inference collaborator failed");
                return DiagnosisReport::error(format!(
                    "기저질환 분석 중 오류가 발생했습니다: {e}"
                ));
            }
        };

        match parse_disease_names(extract_json_array(&content)) {
            Ok(names) => {
                tracing::info!(diseases = names.len(), "disease inference completed");
                DiagnosisReport::success(names)
            }
            Err(e) => {
                tracing::warn!(error = %e, "diagnosis array parsing failed");
                DiagnosisReport::partial(
                    "분석은 완료되었으나 결과 파싱에 오류가 발생했습니다.".into(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::chat::MockChatClient;
    use crate::inference::types::{
        RISK_LOW, RISK_MEDIUM, RISK_UNKNOWN, STATUS_ERROR, STATUS_PARTIAL_SUCCESS, STATUS_SUCCESS,
    };
    use serde_json::json;

    fn pipeline_with(chat: MockChatClient) -> DiseaseInferencePipeline {
        DiseaseInferencePipeline::new(Box::new(chat))
    }

    fn medication_data() -> Value {
        json!({
            "PrescriptionData": [{
                "JinRyoGaesiIl": "2023-11-01",
                "MedicationDetails": [{
                    "ChoBangYakPumMyung": "메트포르민정500mg",
                    "TuyakIlSoo": "30"
                }]
            }]
        })
    }

    #[test]
    fn fenced_response_yields_two_diseases_medium_risk() {
        let pipeline = pipeline_with(MockChatClient::new(
            "```json\n[\"당뇨병\", \"고혈압\"]\n```",
        ));

        let report = pipeline.infer(&medication_data());

        assert_eq!(report.status, STATUS_SUCCESS);
        assert_eq!(report.risk_level, RISK_MEDIUM);
        assert_eq!(report.predicted_diseases.len(), 2);
        assert_eq!(report.predicted_diseases[0].disease_name, "당뇨병");
        assert_eq!(report.predicted_diseases[1].disease_name, "고혈압");
    }

    #[test]
    fn bare_empty_array_yields_low_risk_success() {
        let pipeline = pipeline_with(MockChatClient::new("[]"));

        let report = pipeline.infer(&medication_data());

        assert_eq!(report.status, STATUS_SUCCESS);
        assert_eq!(report.risk_level, RISK_LOW);
        assert!(report.predicted_diseases.is_empty());
    }

    #[test]
    fn response_without_choices_reports_error_without_raising() {
        let pipeline = pipeline_with(MockChatClient::from_response_body(
            r#"{"usage":{"total_tokens":10}}"#,
        ));

        let report = pipeline.infer(&medication_data());

        assert_eq!(report.status, STATUS_ERROR);
        assert_eq!(report.risk_level, RISK_UNKNOWN);
        assert!(report.predicted_diseases.is_empty());
    }

    #[test]
    fn unreachable_collaborator_reports_error() {
        let pipeline = pipeline_with(MockChatClient::failing("connection refused"));

        let report = pipeline.infer(&medication_data());

        assert_eq!(report.status, STATUS_ERROR);
        assert!(report.message.contains("오류"));
    }

    #[test]
    fn unparsable_content_reports_partial_success() {
        let pipeline = pipeline_with(MockChatClient::new("죄송하지만 분석할 수 없습니다."));

        let report = pipeline.infer(&medication_data());

        assert_eq!(report.status, STATUS_PARTIAL_SUCCESS);
        assert_eq!(report.risk_level, RISK_UNKNOWN);
        assert!(report.predicted_diseases.is_empty());
    }

    #[test]
    fn malformed_medication_data_still_runs_inference() {
        let pipeline = pipeline_with(MockChatClient::new("[]"));

        // Extraction degrades to empty; the pipeline proceeds regardless.
        let report = pipeline.infer(&json!({"unexpected": true}));
        assert_eq!(report.status, STATUS_SUCCESS);
        assert_eq!(report.risk_level, RISK_LOW);
    }
}
