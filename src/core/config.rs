use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SYSTEM_MESSAGE: &str = "
***ここに設定を記述***

上記の設定を参考に、性格や口調や言葉の作り方を模倣してください。
";
const DEFAULT_API_HOSTNAME: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
const DEFAULT_BOOTSTRAP_MESSAGE: &str = "準備は良いですか？";
const DEFAULT_STAGING_PATH: &str = "./input.m4a";
// The model tops out around 4000 tokens
const DEFAULT_TOKEN_THRESHOLD: u32 = 3500;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60 * 10;

#[derive(Clone)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub chat_model: String,
    pub transcription_model: String,
    pub system_message: String,
    pub bootstrap_message: String,
    pub token_threshold: u32,
    pub staging_path: String,
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Built-in settings for the given API host without looking at
    /// the environment.
    pub fn new(openai_api_hostname: &str, openai_api_key: &str) -> Self {
        Self {
            openai_api_hostname: openai_api_hostname.to_string(),
            openai_api_key: openai_api_key.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            bootstrap_message: DEFAULT_BOOTSTRAP_MESSAGE.to_string(),
            token_threshold: DEFAULT_TOKEN_THRESHOLD,
            staging_path: DEFAULT_STAGING_PATH.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn chat_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.openai_api_hostname.trim_end_matches("/")
        )
    }

    pub fn transcription_url(&self) -> String {
        format!(
            "{}/v1/audio/transcriptions",
            self.openai_api_hostname.trim_end_matches("/")
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// Falls back to the default when the variable is missing or garbage
// so a typo doesn't take the whole tool down
fn env_number<T: FromStr + fmt::Display + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value {:?} for {}, using {}", raw, key, default);
            default
        }),
        Err(_) => default,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let openai_api_hostname =
            env::var("BANTER_API_HOST").unwrap_or_else(|_| DEFAULT_API_HOSTNAME.to_string());
        let openai_api_key = env::var("OPENAI_API_KEY")
            .or_else(|_| env::var("OPENAI_API"))
            .unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let chat_model =
            env::var("BANTER_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
        let transcription_model = env::var("BANTER_TRANSCRIPTION_MODEL")
            .unwrap_or_else(|_| DEFAULT_TRANSCRIPTION_MODEL.to_string());
        let system_message = env::var("BANTER_SYSTEM_MESSAGE")
            .unwrap_or_else(|_| DEFAULT_SYSTEM_MESSAGE.to_string());
        let bootstrap_message = env::var("BANTER_BOOTSTRAP_MESSAGE")
            .unwrap_or_else(|_| DEFAULT_BOOTSTRAP_MESSAGE.to_string());
        let staging_path =
            env::var("BANTER_STAGING_PATH").unwrap_or_else(|_| DEFAULT_STAGING_PATH.to_string());

        Self {
            openai_api_hostname,
            openai_api_key,
            chat_model,
            transcription_model,
            system_message,
            bootstrap_message,
            token_threshold: env_number("BANTER_TOKEN_THRESHOLD", DEFAULT_TOKEN_THRESHOLD),
            staging_path,
            poll_interval_ms: env_number("BANTER_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS),
            request_timeout_secs: env_number(
                "BANTER_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
        }
    }
}

// Hand written so the API key never ends up in logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_hostname", &self.openai_api_hostname)
            .field("openai_api_key", &"<redacted>")
            .field("chat_model", &self.chat_model)
            .field("transcription_model", &self.transcription_model)
            .field("bootstrap_message", &self.bootstrap_message)
            .field("token_threshold", &self.token_threshold)
            .field("staging_path", &self.staging_path)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
