use super::types::MedicationSummary;

/// System role for the inference collaborator: closed-vocabulary selection,
/// JSON-array-only output.
pub const ANALYSIS_SYSTEM_PROMPT: &str = "당신은 의료 데이터 분석 전문가입니다. \
처방 데이터를 분석하여 기저질환을 추정하되, 반드시 주어진 질환 목록에서만 선택하고 \
JSON 배열 형식으로만 응답해야 합니다. 다른 텍스트는 포함하지 마세요.";

/// The fixed contract: at most four diseases, only from the closed
/// vocabulary, only when same-class medication runs ≥14 days cumulative or
/// recurs across prescriptions; short non-recurring courses and ambiguous
/// cases must be excluded; `[]` is always a valid answer.
const ANALYSIS_CONTRACT: &str = r#"다음은 한 환자의 복수 처방 이력이다. 아래 처방 이력을 분석하여, 이 환자가 가지고 있을 가능성이 있는 **기저질환**을 최대 4개까지 추정하라.

단, 다음 조건을 모두 만족해야만 기저질환으로 추정하라:
- 동일 계열 또는 동일 효능의 약물이 **총 14일 이상** 또는 **반복적으로 처방**된 경우
- 단기 처방(7일 이내)이면서 반복되지 않은 경우는 기저질환 판단에 **사용하지 마라**
- 기저질환과 명확히 연관되지 않은 약물(예: 감기약, 소화제, 진통제 등)은 고려하지 마라
- 판단이 모호한 경우는 절대로 추정하지 말고 제외하라

다음 목록에 포함된 질환만 선택할 수 있으며, 목록에 없는 질환은 절대로 추정하지 마라.
출력은 반드시 아래와 같은 **JSON 배열 형식**으로 하며, 기타 설명은 포함하지 마라.

질환이 하나도 추정되지 않는 경우는 빈 배열 `[]`을 출력하라.

가능한 질환:
- 뇌전증, 치매, 파킨슨병, 뇌졸중 후유증, 만성두통
- 심부전, 고혈압, 관상동맥질환, 심방세동, 고지혈증
- COPD, 천식, 폐섬유화증, 수면무호흡증
- 빈혈, 혈우병, 항응고치료중, 고형암, 혈액암
- 당뇨병, 갑상선기능이상, 골다공증, 부신기능장애
- 만성신부전, 투석환자, 신증후군
- 간경변, B형간염, C형간염, 비알코올성지방간
- 위염, 소화성궤양, 염증성장질환, 과민성장증후군
- 류마티스관절염, 골관절염, 통풍, 전신홍반루푸스
- 자가면역질환, 장기이식 후 면역억제 치료 중
- HIV, 결핵, 만성바이러스간염
- 우울증, 조현병, 양극성장애, 불안장애
- PKU, 윌슨병, 헌팅턴병 등

출력 형식:
```json
[
  "질환명1",
  "질환명2",
  "질환명3",
  "질환명4"
]
```"#;

/// Render the extracted summary as the prescription-history section of the
/// prompt, one prescription per block.
pub fn format_medication_history(summary: &MedicationSummary) -> String {
    let mut out = String::new();

    for prescription in &summary.prescriptions {
        out.push_str("진료일자: ");
        out.push_str(prescription.date.as_deref().unwrap_or(""));
        out.push('\n');

        for drug in &prescription.drugs {
            out.push_str(&format!(
                "- 약물명: {}, 효능: {}, 투약일수: {}, 성분: {}, ATC분류: {}, KPIC분류: {}\n",
                drug.name,
                drug.effect.as_deref().unwrap_or(""),
                drug.dosage_days.as_deref().unwrap_or(""),
                drug.ingredient.as_deref().unwrap_or(""),
                drug.atc_class.as_deref().unwrap_or(""),
                drug.kpic_class.as_deref().unwrap_or(""),
            ));
        }
        out.push('\n');
    }

    out
}

/// Build the full user prompt: fixed contract + the patient's history.
/// Callers cannot template the contract itself.
pub fn build_analysis_prompt(summary: &MedicationSummary) -> String {
    format!(
        "{ANALYSIS_CONTRACT}\n\n처방 이력:\n{}",
        format_medication_history(summary)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::types::{DrugDetail, Prescription};

    fn summary() -> MedicationSummary {
        MedicationSummary {
            prescriptions: vec![Prescription {
                date: Some("2023-11-01".into()),
                drugs: vec![DrugDetail {
                    name: "메트포르민정500mg".into(),
                    effect: Some("혈당강하제".into()),
                    dosage_days: Some("30".into()),
                    ingredient: Some("metformin".into()),
                    atc_class: Some("A10BA02".into()),
                    kpic_class: None,
                }],
            }],
            drug_names: vec!["메트포르민정500mg".into()],
        }
    }

    #[test]
    fn prompt_contains_contract_and_history() {
        let prompt = build_analysis_prompt(&summary());
        assert!(prompt.contains("최대 4개까지"));
        assert!(prompt.contains("빈 배열 `[]`"));
        assert!(prompt.contains("진료일자: 2023-11-01"));
        assert!(prompt.contains("메트포르민정500mg"));
        assert!(prompt.contains("A10BA02"));
    }

    #[test]
    fn contract_pins_inclusion_thresholds() {
        assert!(ANALYSIS_CONTRACT.contains("총 14일 이상"));
        assert!(ANALYSIS_CONTRACT.contains("7일 이내"));
        assert!(ANALYSIS_CONTRACT.contains("목록에 없는 질환은 절대로 추정하지 마라"));
    }

    #[test]
    fn vocabulary_mentions_core_conditions() {
        for condition in ["당뇨병", "고혈압", "천식", "통풍", "우울증"] {
            assert!(ANALYSIS_CONTRACT.contains(condition));
        }
    }

    #[test]
    fn missing_fields_render_as_blanks() {
        let mut s = summary();
        s.prescriptions[0].drugs[0].kpic_class = None;
        let history = format_medication_history(&s);
        assert!(history.contains("KPIC분류: \n"));
    }

    #[test]
    fn empty_summary_renders_empty_history() {
        assert_eq!(format_medication_history(&MedicationSummary::default()), "");
    }

    #[test]
    fn system_prompt_demands_json_only() {
        assert!(ANALYSIS_SYSTEM_PROMPT.contains("JSON 배열"));
    }
}
