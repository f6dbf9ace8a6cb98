use log::error;
use repbook_domain::WeightUnit;

pub trait SettingsService {
    fn get_settings(&self) -> Result<Settings, String>;
    fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

pub trait SettingsRepository {
    fn read_settings(&self) -> Result<Settings, String>;
    fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    #[serde(with = "WeightUnitDef")]
    pub weight_unit: WeightUnit,
    pub theme: Theme,
}

impl Settings {
    #[must_use]
    pub fn current_theme(&self) -> Theme {
        match self.theme {
            Theme::System => {
                let Some(window) = web_sys::window() else {
                    error!("failed to access window to determine preferred color scheme");
                    return Theme::Light;
                };
                match window.match_media("(prefers-color-scheme: dark)") {
                    Ok(Some(media_query_list)) if media_query_list.matches() => Theme::Dark,
                    Ok(Some(_)) => Theme::Light,
                    Ok(None) => {
                        error!("failed to determine preferred color scheme");
                        Theme::Light
                    }
                    Err(_) => {
                        error!("failed to match media to determine preferred color scheme");
                        Theme::Light
                    }
                }
            }
            Theme::Light | Theme::Dark => self.theme,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    System,
    #[default]
    Light,
    Dark,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(remote = "WeightUnit")]
enum WeightUnitDef {
    Lbs,
    Kg,
}
