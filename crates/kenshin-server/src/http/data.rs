use super::{api_error_response, store_error_response, with_store};
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kenshin_api::{coerce_f64, coerce_string, messages, ApiError, MessageResponse, SaveRecordRequest};
use kenshin_model::{
    columns, scoring_rule_key, Measurements, ScoredRecord, ScoringRule, SubjectId, ACTIVE_RULE_KEY,
};
use kenshin_score::{normalize_total, score_record};
use kenshin_store::{unix_millis, StoreError};
use serde_json::Value;
use tracing::{info, warn};

const ROUTE_SAVE: &str = "/api/data/save";

/// Resolve the active scoring rule from settings: `active_rule` names the
/// rule id, `scoring_rule:{id}` holds the rule document. Any gap in that
/// chain is a configuration error, never a silent default.
fn load_active_rule(store: &dyn kenshin_store::HealthStore) -> Result<ScoringRule, LoadRuleError> {
    let pointer = store
        .get_setting(ACTIVE_RULE_KEY)
        .map_err(LoadRuleError::Store)?
        .ok_or_else(|| LoadRuleError::Missing("no active_rule setting".to_string()))?;
    let rule_id = coerce_string(&pointer.value)
        .ok_or_else(|| LoadRuleError::Missing("active_rule is not an id".to_string()))?;
    let stored = store
        .get_setting(&scoring_rule_key(&rule_id))
        .map_err(LoadRuleError::Store)?
        .ok_or_else(|| LoadRuleError::Missing(format!("scoring rule {rule_id} not found")))?;
    ScoringRule::from_value(&stored.value)
        .map_err(|e| LoadRuleError::Missing(e.to_string()))
}

pub(crate) enum LoadRuleError {
    Missing(String),
    Store(StoreError),
}

struct NumericField {
    column: &'static str,
    value: Option<Value>,
}

fn numeric_fields(req: &SaveRecordRequest) -> [NumericField; 10] {
    [
        NumericField { column: columns::BMI, value: req.bmi.clone() },
        NumericField { column: columns::S_BP, value: req.s_bp.clone() },
        NumericField { column: columns::D_BP, value: req.d_bp.clone() },
        NumericField { column: columns::BS, value: req.bs.clone() },
        NumericField { column: columns::HBA1C, value: req.hba1c.clone() },
        NumericField { column: columns::LDL, value: req.ldl.clone() },
        NumericField { column: columns::TG, value: req.tg.clone() },
        NumericField { column: columns::AST, value: req.ast.clone() },
        NumericField { column: columns::ALT, value: req.alt.clone() },
        NumericField { column: columns::GTP, value: req.gtp.clone() },
    ]
}

/// POST /api/data/save: score one validated row under the active rule and
/// persist it. Field presence is checked before authentication so the 400
/// can name the missing field; the owner must exist in `users`.
pub(crate) async fn save_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let request_id = state.next_request_id();
    info!(request_id = %request_id, route = ROUTE_SAVE, "request start");

    let req: SaveRecordRequest = match serde_json::from_value(body) {
        Ok(req) => req,
        Err(e) => return api_error_response(ApiError::invalid_body(&e.to_string())),
    };

    let Some(user_id) = req.user_id.clone() else {
        return api_error_response(ApiError::missing_field("userId"));
    };
    let Some(raw_id) = req.id.clone() else {
        return api_error_response(ApiError::missing_field(columns::ID));
    };
    let fields = numeric_fields(&req);
    for field in &fields {
        if field.value.is_none() {
            return api_error_response(ApiError::missing_field(field.column));
        }
    }

    let Some(subject_raw) = coerce_string(&raw_id) else {
        return api_error_response(ApiError::invalid_body("ID must be a string or number"));
    };
    let subject_id = match SubjectId::parse(&subject_raw) {
        Ok(id) => id,
        Err(e) => return api_error_response(ApiError::invalid_body(&e.to_string())),
    };

    let mut values = [0.0_f64; 10];
    for (slot, field) in values.iter_mut().zip(fields.iter()) {
        match field.value.as_ref().and_then(coerce_f64) {
            Some(v) => *slot = v,
            None => {
                return api_error_response(ApiError::invalid_body(&format!(
                    "{} is not a number",
                    field.column
                )))
            }
        }
    }
    let measurements = Measurements {
        bmi: values[0],
        s_bp: values[1],
        d_bp: values[2],
        bs: values[3],
        hba1c: values[4],
        ldl: values[5],
        tg: values[6],
        ast: values[7],
        alt: values[8],
        gtp: values[9],
    };

    let auth_user = user_id.clone();
    let known = match with_store(&state, move |store| store.user_exists(&auth_user)).await {
        Ok(known) => known,
        Err(e) => return store_error_response(&request_id, ROUTE_SAVE, &e),
    };
    if !known {
        return api_error_response(ApiError::unauthenticated());
    }

    let rule = match with_store(&state, |store| Ok(load_active_rule(store))).await {
        Ok(Ok(rule)) => rule,
        Ok(Err(LoadRuleError::Missing(reason))) => {
            warn!(request_id = %request_id, route = ROUTE_SAVE, reason = %reason, "scoring rule unavailable");
            return api_error_response(ApiError::missing_configuration(&reason));
        }
        Ok(Err(LoadRuleError::Store(e))) | Err(e) => {
            return store_error_response(&request_id, ROUTE_SAVE, &e)
        }
    };

    let breakdown = match score_record(&measurements, &rule) {
        Ok(b) => b,
        Err(err) => {
            warn!(request_id = %request_id, route = ROUTE_SAVE, reason = %err, "scoring rule rejected");
            return api_error_response(ApiError::missing_configuration(&err.to_string()));
        }
    };

    let now = unix_millis();
    let record = ScoredRecord {
        subject_id,
        user_id,
        measurements,
        bmi_score: breakdown.bmi.score,
        blood_pressure_score: breakdown.blood_pressure.score,
        blood_sugar_score: breakdown.blood_sugar.score,
        lipid_score: breakdown.lipid.score,
        liver_score: breakdown.liver.score,
        total_score: normalize_total(Some(breakdown.total_score)),
        bmi_tier: breakdown.bmi.tier,
        blood_pressure_tier: breakdown.blood_pressure.tier,
        blood_sugar_tier: breakdown.blood_sugar.tier,
        lipid_tier: breakdown.lipid.tier,
        liver_tier: breakdown.liver.tier,
        created_at: now,
        updated_at: now,
    };

    match with_store(&state, move |store| store.insert_scored(&record)).await {
        Ok(_id) => Json(MessageResponse::new(messages::SAVE_OK)).into_response(),
        Err(e) => store_error_response(&request_id, ROUTE_SAVE, &e),
    }
}

/// GET /api/data/result: all persisted records in insertion order.
pub(crate) async fn result_handler(State(state): State<AppState>) -> Response {
    let request_id = state.next_request_id();
    match with_store(&state, |store| store.query_all_scored()).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => store_error_response(&request_id, "/api/data/result", &e),
    }
}
