//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "meow".to_string()
}

pub fn default_data_dir() -> String {
    "~/.meow".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_completion_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

pub fn default_device_name() -> String {
    "meow".to_string()
}

pub fn default_pairing_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_pairing_port() -> u16 {
    3000
}

pub fn default_pairing_path() -> String {
    "/login".to_string()
}

pub fn default_status_command() -> Vec<String> {
    vec!["neofetch".to_string(), "--stdout".to_string()]
}

pub fn default_speedtest_command() -> Vec<String> {
    vec!["speedtest".to_string(), "--progress=no".to_string()]
}
