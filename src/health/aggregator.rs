use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::filter::filter_prescription_records;
use crate::auth::SessionCredential;
use crate::crypto::AesSessionMaterial;
use crate::gateway::{GatewayClient, GatewayError, SessionHandshake, StatusPolicy};

pub const CHECKUP_PATH: &str = "/api/v1.0/nhissimpleauth/ggpab003m0105";
pub const MEDICATION_PATH: &str =
    "/api/v1.0/nhissimpleauth/retrievetreatmentinjectioninformationperson";

pub const STATUS_SUCCESS: &str = "SUCCESS";
pub const STATUS_ERROR: &str = "ERROR";

/// Combined result of the two dependent data calls. Built incrementally:
/// on a data-call failure whatever was already fetched is preserved and
/// `status` flips to `ERROR` — callers must check `status`, not rely on
/// errors, for this entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedHealthRecord {
    pub health_checkup_data: Option<Value>,
    pub medication_data: Option<Value>,
    pub status: String,
    pub message: String,
}

/// Fetches checkup and medication history for an authenticated session.
/// Each call performs its own hybrid handshake — the per-call session key is
/// deliberately not shared between the two calls.
pub struct HealthDataAggregator {
    client: GatewayClient,
}

impl HealthDataAggregator {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Best-effort aggregate. Only a credential precondition violation is
    /// returned as `Err`; data-call failures degrade to `status = ERROR`.
    pub fn fetch_aggregate(
        &self,
        credential: &SessionCredential,
    ) -> Result<AggregatedHealthRecord, GatewayError> {
        credential.ensure_usable()?;

        let _span = tracing::info_span!("fetch_aggregate").entered();
        let mut record = AggregatedHealthRecord {
            health_checkup_data: None,
            medication_data: None,
            status: String::new(),
            message: String::new(),
        };

        match self.fetch_both(credential, &mut record) {
            Ok(()) => {
                record.status = STATUS_SUCCESS.into();
                record.message = "건강 정보 조회가 완료되었습니다.".into();
            }
            Err(e) => {
                tracing::warn!(error = %e, "health data aggregation degraded");
                record.status = STATUS_ERROR.into();
                record.message = format!("건강 정보 조회 중 오류가 발생했습니다: {e}");
            }
        }

        Ok(record)
    }

    fn fetch_both(
        &self,
        credential: &SessionCredential,
        record: &mut AggregatedHealthRecord,
    ) -> Result<(), GatewayError> {
        record.health_checkup_data = Some(self.call_data_endpoint(CHECKUP_PATH, credential)?);

        let medication = self.call_data_endpoint(MEDICATION_PATH, credential)?;
        record.medication_data = Some(filter_prescription_records(medication));

        Ok(())
    }

    fn call_data_endpoint(
        &self,
        path: &str,
        credential: &SessionCredential,
    ) -> Result<Value, GatewayError> {
        let handshake = SessionHandshake::establish(&self.client)?;
        let body = data_request_body(&handshake.material, credential);
        let envelope =
            self.client
                .call(path, &body, &handshake.wrapped_key, StatusPolicy::RequireOk)?;
        Ok(envelope.into_value())
    }
}

/// The four gateway-issued session fields travel in plaintext (the gateway
/// minted them); the personal fields are stripped of the `ENC:` marker and
/// re-encrypted under this call's fresh session key.
fn data_request_body(material: &AesSessionMaterial, credential: &SessionCredential) -> Value {
    json!({
        "CxId": credential.cx_id.clone().unwrap_or_default(),
        "PrivateAuthType": credential.private_auth_type.clone().unwrap_or_default(),
        "ReqTxId": credential.req_tx_id.clone().unwrap_or_default(),
        "Token": credential.token.clone().unwrap_or_default(),
        "TxId": credential.tx_id.clone().unwrap_or_default(),
        "UserName": material.encrypt_field(&SessionCredential::stripped(&credential.user_name)),
        "BirthDate": material.encrypt_field(&SessionCredential::stripped(&credential.birth_date)),
        "UserCellphoneNumber":
            material.encrypt_field(&SessionCredential::stripped(&credential.phone_number)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewaySettings;
    use crate::gateway::testkit::test_public_key_body;
    use crate::gateway::transport::{MockReply, MockTransport};
    use std::sync::Arc;

    fn credential() -> SessionCredential {
        SessionCredential {
            cx_id: Some("cx-1".into()),
            private_auth_type: Some("0".into()),
            req_tx_id: Some("req-1".into()),
            token: Some("tok-1".into()),
            tx_id: Some("tx-1".into()),
            user_name: Some("ENC:enc-name".into()),
            birth_date: Some("ENC:enc-birth".into()),
            phone_number: Some("ENC:enc-phone".into()),
        }
    }

    fn aggregator_with(transport: Arc<MockTransport>) -> HealthDataAggregator {
        HealthDataAggregator::new(GatewayClient::with_transport(
            GatewaySettings::for_tests(),
            transport,
        ))
    }

    const CHECKUP_OK: &str = r#"{"Status":"OK","ResultList":[{"GumJinYear":"2023"}]}"#;
    const MEDICATION_OK: &str = r#"{
        "Status": "OK",
        "ResultList": [
            {"JinRyoHyungTae": "처방조제", "ChoBangYakPumMyung": "메트포르민"},
            {"JinRyoHyungTae": "일반외래", "ChoBangYakPumMyung": "기타"}
        ]
    }"#;

    #[test]
    fn aggregates_both_calls_and_filters_medication() {
        let transport = Arc::new(MockTransport::new(&test_public_key_body()));
        transport.push_reply(MockReply::Body(CHECKUP_OK.into()));
        transport.push_reply(MockReply::Body(MEDICATION_OK.into()));
        let aggregator = aggregator_with(transport.clone());

        let record = aggregator.fetch_aggregate(&credential()).unwrap();

        assert_eq!(record.status, STATUS_SUCCESS);
        assert!(record.health_checkup_data.is_some());

        let medication = record.medication_data.unwrap();
        let list = medication["ResultList"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["ChoBangYakPumMyung"], "메트포르민");

        // One handshake per data call: two key fetches, two POSTs.
        assert_eq!(transport.get_count(), 2);
        assert_eq!(transport.post_count(), 2);
    }

    #[test]
    fn each_call_uses_its_own_wrapped_key() {
        let transport = Arc::new(MockTransport::new(&test_public_key_body()));
        transport.push_reply(MockReply::Body(CHECKUP_OK.into()));
        transport.push_reply(MockReply::Body(MEDICATION_OK.into()));
        let aggregator = aggregator_with(transport.clone());

        aggregator.fetch_aggregate(&credential()).unwrap();

        let posts = transport.posts();
        assert_ne!(posts[0].enc_key, posts[1].enc_key);
    }

    #[test]
    fn data_body_carries_session_fields_plaintext_and_reencrypted_personals() {
        let transport = Arc::new(MockTransport::new(&test_public_key_body()));
        transport.push_reply(MockReply::Body(CHECKUP_OK.into()));
        transport.push_reply(MockReply::Body(MEDICATION_OK.into()));
        let aggregator = aggregator_with(transport.clone());

        aggregator.fetch_aggregate(&credential()).unwrap();

        let body = &transport.posts()[0].body;
        assert_eq!(body["CxId"], "cx-1");
        assert_eq!(body["ReqTxId"], "req-1");
        assert_eq!(body["Token"], "tok-1");
        assert_eq!(body["TxId"], "tx-1");

        // Re-encrypted, so neither the marker nor the stripped value appears.
        let user_name = body["UserName"].as_str().unwrap();
        assert!(!user_name.contains("ENC:"));
        assert_ne!(user_name, "enc-name");
        assert!(!user_name.is_empty());
    }

    #[test]
    fn missing_tx_id_fails_before_any_network_call() {
        let transport = Arc::new(MockTransport::new(&test_public_key_body()));
        let aggregator = aggregator_with(transport.clone());

        let mut incomplete = credential();
        incomplete.tx_id = None;

        let result = aggregator.fetch_aggregate(&incomplete);
        assert!(matches!(
            result,
            Err(GatewayError::IncompleteCredential(_))
        ));
        assert_eq!(transport.get_count(), 0);
        assert_eq!(transport.post_count(), 0);
    }

    #[test]
    fn checkup_failure_degrades_to_error_status() {
        let transport = Arc::new(MockTransport::new(&test_public_key_body()));
        transport.push_reply(MockReply::Unavailable("connect timeout".into()));
        let aggregator = aggregator_with(transport);

        let record = aggregator.fetch_aggregate(&credential()).unwrap();
        assert_eq!(record.status, STATUS_ERROR);
        assert!(record.health_checkup_data.is_none());
        assert!(record.medication_data.is_none());
        assert!(record.message.contains("오류"));
    }

    #[test]
    fn medication_failure_preserves_partial_checkup_data() {
        let transport = Arc::new(MockTransport::new(&test_public_key_body()));
        transport.push_reply(MockReply::Body(CHECKUP_OK.into()));
        transport.push_reply(MockReply::Body(
            r#"{"Status":"Error","Message":"조회 실패","ErrorLog":"E500"}"#.into(),
        ));
        let aggregator = aggregator_with(transport);

        let record = aggregator.fetch_aggregate(&credential()).unwrap();
        assert_eq!(record.status, STATUS_ERROR);
        assert!(record.health_checkup_data.is_some());
        assert!(record.medication_data.is_none());
    }
}
