use leaf_class_core::{DownloadView, Theme};
use url::Url;

const OVERLAY_SCRIPT: &str = include_str!("../scripts/shell_overlay.js");

/// Installed on every page of the main window before the site's own scripts.
pub(crate) fn initialization_script() -> &'static str {
    OVERLAY_SCRIPT
}

pub(crate) fn render_downloads_script(view: &DownloadView) -> Result<String, String> {
    let view_json = serde_json::to_string(view)
        .map_err(|error| format!("Failed to serialize download view: {error}"))?;
    Ok(format!(
        "window.__leafClassShell && window.__leafClassShell.renderDownloads({view_json});"
    ))
}

pub(crate) fn apply_theme_script(theme: Theme) -> String {
    format!(
        "window.__leafClassShell && window.__leafClassShell.applyTheme({:?});",
        theme.as_str()
    )
}

const OFFLINE_PAGE_SCRIPT: &str = r#"(function () {
  if (navigator.onLine !== false || document.getElementById("leaf-class-offline")) {
    return;
  }
  document.title = "Unable to load page";
  document.body.innerHTML =
    '<div id="leaf-class-offline" ' +
    'style="font-family:sans-serif;text-align:center;margin-top:20vh">' +
    "<h1>Unable to load page</h1>" +
    "<p>Please check your internet connection.</p>" +
    '<button id="leaf-class-offline-retry" type="button">Try Again</button>' +
    "</div>";
  document.getElementById("leaf-class-offline-retry").addEventListener("click", function () {
    location.reload();
  });
})();"#;

/// Only remote pages can fail for lack of a network.
pub(crate) fn should_check_offline(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Replaces the current document with a retry page when the network is down.
pub(crate) fn offline_page_script() -> &'static str {
    OFFLINE_PAGE_SCRIPT
}
