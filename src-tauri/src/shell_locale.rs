use std::env;

use crate::LOCALE_ENV;

#[derive(Debug, Clone, Copy)]
pub struct ShellTexts {
    pub menu_app: &'static str,
    pub menu_new_trade: &'static str,
    pub menu_export_data: &'static str,
    pub menu_quit: &'static str,
    pub menu_view: &'static str,
    pub menu_reload: &'static str,
    pub menu_toggle_theme: &'static str,
    pub menu_zoom_in: &'static str,
    pub menu_zoom_out: &'static str,
    pub menu_zoom_reset: &'static str,
    pub menu_fullscreen: &'static str,
    pub menu_tools: &'static str,
    pub menu_devtools: &'static str,
    pub menu_help: &'static str,
    pub menu_check_updates: &'static str,
    pub menu_about: &'static str,

    pub export_dialog_title: &'static str,
    pub export_default_file_name: &'static str,
    pub export_filter_json: &'static str,
    pub export_filter_all: &'static str,

    pub about_title: &'static str,
    pub about_detail: &'static str,

    pub update_available_title: &'static str,
    pub update_available_message: &'static str,
    pub update_download: &'static str,
    pub update_later: &'static str,
    pub update_ready_title: &'static str,
    pub update_ready_message: &'static str,
    pub update_restart_now: &'static str,
    pub update_none_title: &'static str,
    pub update_none_message: &'static str,
    pub update_failed_message: &'static str,
    pub update_error_title: &'static str,
    pub update_error_message: &'static str,
}

const FR_TEXTS: ShellTexts = ShellTexts {
    menu_app: "MetrixSight",
    menu_new_trade: "Nouveau Trade",
    menu_export_data: "Exporter les données",
    menu_quit: "Quitter",
    menu_view: "Affichage",
    menu_reload: "Actualiser",
    menu_toggle_theme: "Basculer le thème",
    menu_zoom_in: "Zoom avant",
    menu_zoom_out: "Zoom arrière",
    menu_zoom_reset: "Zoom normal",
    menu_fullscreen: "Plein écran",
    menu_tools: "Outils",
    menu_devtools: "Outils de développement",
    menu_help: "Aide",
    menu_check_updates: "Rechercher des mises à jour…",
    menu_about: "À propos",

    export_dialog_title: "Exporter les données de trading",
    export_default_file_name: "trading-data.json",
    export_filter_json: "Fichiers JSON",
    export_filter_all: "Tous les fichiers",

    about_title: "À propos",
    about_detail: "Application de suivi et d'analyse des performances de trading.",

    update_available_title: "Mise à jour disponible",
    update_available_message: "Une nouvelle version est disponible.",
    update_download: "Télécharger",
    update_later: "Plus tard",
    update_ready_title: "Mise à jour prête",
    update_ready_message:
        "La mise à jour a été téléchargée.\nL'application va redémarrer pour l'appliquer.",
    update_restart_now: "Redémarrer maintenant",
    update_none_title: "Mises à jour",
    update_none_message: "Aucune mise à jour disponible.",
    update_failed_message: "Échec de la vérification des mises à jour.",
    update_error_title: "Mise à jour",
    update_error_message: "Erreur de mise à jour",
};

const EN_TEXTS: ShellTexts = ShellTexts {
    menu_app: "MetrixSight",
    menu_new_trade: "New Trade",
    menu_export_data: "Export Data",
    menu_quit: "Quit",
    menu_view: "View",
    menu_reload: "Reload",
    menu_toggle_theme: "Toggle Theme",
    menu_zoom_in: "Zoom In",
    menu_zoom_out: "Zoom Out",
    menu_zoom_reset: "Actual Size",
    menu_fullscreen: "Full Screen",
    menu_tools: "Tools",
    menu_devtools: "Developer Tools",
    menu_help: "Help",
    menu_check_updates: "Check for Updates…",
    menu_about: "About",

    export_dialog_title: "Export trading data",
    export_default_file_name: "trading-data.json",
    export_filter_json: "JSON Files",
    export_filter_all: "All Files",

    about_title: "About",
    about_detail: "Trading performance tracking and analysis.",

    update_available_title: "Update available",
    update_available_message: "A new version is available.",
    update_download: "Download",
    update_later: "Later",
    update_ready_title: "Update ready",
    update_ready_message:
        "The update has been downloaded.\nThe application will restart to apply it.",
    update_restart_now: "Restart now",
    update_none_title: "Updates",
    update_none_message: "No update available.",
    update_failed_message: "Failed to check for updates.",
    update_error_title: "Update",
    update_error_message: "Update error",
};

pub fn shell_texts_for_locale(locale: &str) -> ShellTexts {
    if locale == "en-US" {
        return EN_TEXTS;
    }

    FR_TEXTS
}

pub(crate) fn normalize_shell_locale(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw == "fr-FR" {
        return Some("fr-FR");
    }
    if raw == "en-US" {
        return Some("en-US");
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("fr") {
        return Some("fr-FR");
    }
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    None
}

pub fn resolve_shell_locale(default_shell_locale: &'static str) -> &'static str {
    for env_key in [LOCALE_ENV, "LC_ALL", "LANG"] {
        if let Ok(value) = env::var(env_key) {
            if let Some(locale) = normalize_shell_locale(&value) {
                return locale;
            }
        }
    }

    default_shell_locale
}

pub fn current_shell_texts(default_shell_locale: &'static str) -> ShellTexts {
    shell_texts_for_locale(resolve_shell_locale(default_shell_locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_texts_for_locale_returns_english_copy() {
        let texts = shell_texts_for_locale("en-US");
        assert_eq!(texts.menu_new_trade, "New Trade");
        assert_eq!(texts.update_none_message, "No update available.");
    }

    #[test]
    fn shell_texts_for_locale_falls_back_to_french_copy() {
        let texts = shell_texts_for_locale("de-DE");
        assert_eq!(texts.menu_new_trade, "Nouveau Trade");
        assert_eq!(texts.menu_quit, "Quitter");
        assert_eq!(texts.export_default_file_name, "trading-data.json");
    }

    #[test]
    fn normalize_shell_locale_accepts_language_prefixes() {
        assert_eq!(normalize_shell_locale("EN_us.UTF-8"), Some("en-US"));
        assert_eq!(normalize_shell_locale("fr_CA"), Some("fr-FR"));
        assert_eq!(normalize_shell_locale("C.UTF-8"), None);
        assert_eq!(normalize_shell_locale("  "), None);
    }
}
