pub const INVALID_INPUT: &str = "invalid_input";
pub const ALREADY_EXISTS: &str = "already_exists";
pub const NOT_CONFIGURED: &str = "not_configured";
pub const CMS_REQUEST_FAILED: &str = "cms_request_failed";
