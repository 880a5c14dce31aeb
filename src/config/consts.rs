/// Base URL of the incident REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://if1stu7r2g.execute-api.us-east-1.amazonaws.com/dev";
/// Request timeout for REST and SMS webhook calls.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Address that receives incidents with no mapped category.
pub const DEFAULT_AREA_ADDRESS: &str = "soporte@utec.edu.pe";
/// Emergency line for high-urgency security incidents.
pub const DEFAULT_EMERGENCY_CONTACT: &str = "+51999999999";
pub const DEFAULT_DASHBOARD_URL: &str = "https://alerta-utec.com/dashboard";

pub const CLASSIFICATION_WORKFLOW_ID: &str = "clasificar_incidentes";
pub const NOTIFICATION_WORKFLOW_ID: &str = "enviar_notificaciones";
pub const CLASSIFICATION_INTERVAL_SECS: u64 = 5 * 60;
pub const NOTIFICATION_INTERVAL_SECS: u64 = 3 * 60;

/// Unresolved high-urgency incidents older than this are escalated.
pub const DEFAULT_STALE_AFTER_MINUTES: i64 = 30;
/// Characters of the description included in an SMS.
pub const SMS_DESCRIPTION_LIMIT: usize = 100;
/// Category label for assignments of incidents with no `tipo`.
pub const UNCATEGORIZED_ASSIGNMENT_LABEL: &str = "default";
/// Category label for alerts of incidents with no `tipo`.
pub const UNCATEGORIZED_ALERT_LABEL: &str = "General";
/// Category whose high-urgency incidents trigger SMS.
pub const SMS_CATEGORY: &str = "Seguridad";
