use std::env;
use std::time::Duration;

use crate::modules::storage::ServiceAccountKey;
use crate::shared::validation::DRIVE_ID_REGEX;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub swagger: SwaggerConfig,
    pub google_drive: GoogleDriveConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Google Drive storage configuration for issue photos
#[derive(Debug, Clone)]
pub struct GoogleDriveConfig {
    /// Decoded service account credential
    pub service_account: ServiceAccountKey,
    /// Parent folder every uploaded photo is created in
    pub folder_id: String,
    /// Base URL for metadata calls (permissions)
    pub api_base_url: String,
    /// Base URL for media uploads
    pub upload_base_url: String,
}

/// Endpoints used by the inspection form client
#[derive(Debug, Clone)]
pub struct InspectionClientConfig {
    /// Returns `{ locations }` / `{ equipments }` for `?type=...`
    pub options_url: String,
    /// Workflow endpoint receiving the `{ task, data }` envelope
    pub submission_url: String,
    /// Photo upload route (`POST /api/upload`)
    pub upload_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            google_drive: GoogleDriveConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Pre-Shift Inspection API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Photo upload API for pre-shift inspections".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl GoogleDriveConfig {
    const DEFAULT_API_BASE_URL: &'static str = "https://www.googleapis.com";
    const DEFAULT_UPLOAD_BASE_URL: &'static str = "https://www.googleapis.com/upload";

    pub fn from_env() -> Result<Self, String> {
        let encoded = env::var("GOOGLE_SERVICE_ACCOUNT")
            .map_err(|_| "GOOGLE_SERVICE_ACCOUNT environment variable is required".to_string())?;
        let service_account = ServiceAccountKey::from_base64(&encoded)
            .map_err(|e| format!("Invalid GOOGLE_SERVICE_ACCOUNT: {}", e))?;

        let folder_id = env::var("GOOGLE_DRIVE_FOLDER_ID")
            .map_err(|_| "Google Drive folder ID is not configured".to_string())?;
        let folder_id = Self::parse_folder_id(&folder_id)?;

        let api_base_url = env::var("GOOGLE_DRIVE_API_URL")
            .unwrap_or_else(|_| Self::DEFAULT_API_BASE_URL.to_string());
        let upload_base_url = env::var("GOOGLE_DRIVE_UPLOAD_URL")
            .unwrap_or_else(|_| Self::DEFAULT_UPLOAD_BASE_URL.to_string());

        Ok(Self {
            service_account,
            folder_id,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            upload_base_url: upload_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn parse_folder_id(raw: &str) -> Result<String, String> {
        let folder_id = raw.trim();
        if !DRIVE_ID_REGEX.is_match(folder_id) {
            return Err(format!(
                "GOOGLE_DRIVE_FOLDER_ID '{}' is not a valid Drive folder ID",
                folder_id
            ));
        }
        Ok(folder_id.to_string())
    }
}

impl InspectionClientConfig {
    const DEFAULT_UPLOAD_URL: &'static str = "http://localhost:3000/api/upload";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        // Options and submission share one workflow endpoint unless overridden
        let api_url = var("INSPECTION_API_URL");

        let options_url = var("INSPECTION_OPTIONS_URL")
            .or_else(|| api_url.clone())
            .ok_or_else(|| {
                "INSPECTION_OPTIONS_URL or INSPECTION_API_URL environment variable is required"
                    .to_string()
            })?;

        let submission_url = var("INSPECTION_SUBMISSION_URL")
            .or(api_url)
            .ok_or_else(|| {
                "INSPECTION_SUBMISSION_URL or INSPECTION_API_URL environment variable is required"
                    .to_string()
            })?;

        let upload_url =
            var("INSPECTION_UPLOAD_URL").unwrap_or_else(|| Self::DEFAULT_UPLOAD_URL.to_string());

        let timeout_secs = var("INSPECTION_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "INSPECTION_REQUEST_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            options_url,
            submission_url,
            upload_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_folder_id_trims_and_accepts_drive_ids() {
        let id = GoogleDriveConfig::parse_folder_id("  1AbC-dEf_23  ").unwrap();
        assert_eq!(id, "1AbC-dEf_23");
    }

    #[test]
    fn test_parse_folder_id_rejects_urls() {
        assert!(
            GoogleDriveConfig::parse_folder_id("https://drive.google.com/drive/folders/1AbC")
                .is_err()
        );
        assert!(GoogleDriveConfig::parse_folder_id("").is_err());
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: "t".to_string(),
            version: "v".to_string(),
            description: "d".to_string(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials(), Some("admin:secret".to_string()));
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_inspection_client_shares_api_url_with_defaults() {
        let config = InspectionClientConfig::from_lookup(lookup_from(&[(
            "INSPECTION_API_URL",
            "https://script.example/exec",
        )]))
        .unwrap();

        assert_eq!(config.options_url, "https://script.example/exec");
        assert_eq!(config.submission_url, "https://script.example/exec");
        assert_eq!(config.upload_url, "http://localhost:3000/api/upload");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_inspection_client_specific_urls_override_shared() {
        let config = InspectionClientConfig::from_lookup(lookup_from(&[
            ("INSPECTION_API_URL", "https://script.example/exec"),
            ("INSPECTION_OPTIONS_URL", "https://options.example/exec"),
            ("INSPECTION_SUBMISSION_URL", ""),
            ("INSPECTION_UPLOAD_URL", "https://yard.example/api/upload"),
            ("INSPECTION_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.options_url, "https://options.example/exec");
        // Blank override falls back to the shared endpoint
        assert_eq!(config.submission_url, "https://script.example/exec");
        assert_eq!(config.upload_url, "https://yard.example/api/upload");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_inspection_client_requires_endpoints() {
        let err = InspectionClientConfig::from_lookup(lookup_from(&[(
            "INSPECTION_OPTIONS_URL",
            "https://options.example/exec",
        )]))
        .unwrap_err();
        assert!(err.contains("INSPECTION_SUBMISSION_URL"));

        let err = InspectionClientConfig::from_lookup(lookup_from(&[("INSPECTION_API_URL", "  ")]))
            .unwrap_err();
        assert!(err.contains("INSPECTION_OPTIONS_URL"));
    }

    #[test]
    fn test_inspection_client_rejects_bad_timeout() {
        let err = InspectionClientConfig::from_lookup(lookup_from(&[
            ("INSPECTION_API_URL", "https://script.example/exec"),
            ("INSPECTION_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();

        assert_eq!(err, "INSPECTION_REQUEST_TIMEOUT_SECS must be a valid number");
    }
}
