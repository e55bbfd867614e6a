//! Route paths.

pub const GET_API_HEALTH: &str = "/api/health";

pub const POST_AUTH_REGISTER: &str = "/api/auth/register";
pub const POST_AUTH_LOGIN: &str = "/api/auth/login";
pub const POST_AUTH_LOGOUT: &str = "/api/auth/logout";
pub const GET_AUTH_ME: &str = "/api/auth/me";

pub const TOKENS: &str = "/api/token";
pub const TOKENS_ID: &str = "/api/token/{id}";
pub const PUT_TOKENS_ID_STATS: &str = "/api/token/{id}/stats";

pub const DEVICES: &str = "/api/device";
pub const DEVICES_ID: &str = "/api/device/{id}";
pub const GET_DEVICES_ID_DETAILS: &str = "/api/device/{id}/details";
pub const POST_DEVICES_ID_ACTIVITY: &str = "/api/device/{id}/activity";

pub const GET_DASHBOARD_STATS: &str = "/api/dashboard/stats";
pub const GET_DASHBOARD_DEVICES: &str = "/api/dashboard/devices";
