use metrics_exporter_prometheus::PrometheusHandle;
use mindcheck::surveys::SurveyKind;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_survey(raw: &str) -> Result<SurveyKind, String> {
    raw.parse::<SurveyKind>().map_err(|err| err.to_string())
}
