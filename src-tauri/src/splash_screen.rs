use std::thread;

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use crate::{main_window, ui_dispatch, APP_NAME, SPLASH_DURATION, SPLASH_WINDOW_LABEL};

fn close_splash_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(SPLASH_WINDOW_LABEL) else {
        return;
    };
    if let Err(error) = window.close() {
        log(&format!("failed to close splash window: {error}"));
    }
}

/// Shows the splash for a fixed time, then swaps it for the main window.
/// Without a splash the main window is shown right away.
pub(crate) fn show_splash_then_main<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str) + Send + Copy + 'static,
{
    let splash = WebviewWindowBuilder::new(
        app_handle,
        SPLASH_WINDOW_LABEL,
        WebviewUrl::App("index.html".into()),
    )
    .title(APP_NAME)
    .inner_size(320.0, 220.0)
    .decorations(false)
    .resizable(false)
    .skip_taskbar(true)
    .center()
    .build();

    if let Err(error) = splash {
        log(&format!("failed to create splash window: {error}"));
        main_window::show_main_window(app_handle, log);
        return;
    }

    let app_handle = app_handle.clone();
    let spawn_result = thread::Builder::new()
        .name("splash-timer".to_string())
        .spawn(move || {
            thread::sleep(SPLASH_DURATION);
            if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(
                &app_handle,
                "replace splash with main window",
                move |main_app| {
                    close_splash_window(main_app, log);
                    main_window::show_main_window(main_app, log);
                },
            ) {
                log(&error);
            }
        });

    if let Err(error) = spawn_result {
        log(&format!("failed to start splash timer: {error}"));
    }
}
