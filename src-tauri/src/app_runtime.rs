use leaf_class_core::{shell_config, ShellConfig};
use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_download_log, append_shutdown_log, append_startup_log,
    download_presenter, logging, main_window, menu_handler, menu_setup, runtime_paths,
    shell_overlay, splash_screen, theme_actions, DownloadState, ShellState, DESKTOP_LOG_FILE,
    MAIN_WINDOW_LABEL,
};

fn load_startup_config() -> ShellState {
    let config_path =
        runtime_paths::default_config_dir().map(|dir| shell_config::config_file_path(&dir));
    let config = match &config_path {
        Some(path) => {
            append_startup_log(&format!("shell config path: {}", path.display()));
            shell_config::load_shell_config(path, append_startup_log)
        }
        None => {
            append_startup_log("no config directory available; using default shell config");
            ShellConfig::default()
        }
    };
    ShellState::new(config, config_path)
}

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(runtime_paths::default_data_root_dir(), DESKTOP_LOG_FILE)
            .display()
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _argv, _cwd| {
            append_desktop_log("second instance launched; focusing main window");
            main_window::show_main_window(app_handle, append_desktop_log);
        }))
        .plugin(tauri_plugin_dialog::init())
        .manage(load_startup_config())
        .invoke_handler(tauri::generate_handler![
            crate::download_bridge_commands::download_cancel,
            crate::download_bridge_commands::download_dismiss,
            crate::download_bridge_commands::download_minimize,
            crate::download_bridge_commands::download_restore,
            crate::download_bridge_commands::download_state,
        ])
        .on_menu_event(|app_handle, event| {
            menu_handler::handle_menu_event(app_handle, event.id().as_ref())
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            if let WindowEvent::CloseRequested { .. } = event {
                main_window::remember_main_window(window.app_handle(), append_desktop_log);
            }
        })
        .on_page_load(|webview, payload| {
            if webview.label() != MAIN_WINDOW_LABEL {
                return;
            }

            match payload.event() {
                PageLoadEvent::Started => {
                    append_desktop_log(&format!("page-load started: {}", payload.url()));
                    main_window::update_title(
                        &webview.window(),
                        payload.url(),
                        true,
                        append_desktop_log,
                    );
                }
                PageLoadEvent::Finished => {
                    append_desktop_log(&format!("page-load finished: {}", payload.url()));
                    main_window::update_title(
                        &webview.window(),
                        payload.url(),
                        false,
                        append_desktop_log,
                    );

                    if shell_overlay::should_check_offline(payload.url()) {
                        if let Err(error) = webview.eval(shell_overlay::offline_page_script()) {
                            append_desktop_log(&format!(
                                "failed to evaluate offline page script: {error}"
                            ));
                        }
                    }

                    let app_handle = webview.app_handle();
                    let theme = app_handle.state::<ShellState>().snapshot().theme;
                    theme_actions::apply_theme(app_handle, theme, append_desktop_log);
                    if let Some(state) = app_handle.try_state::<DownloadState>() {
                        match state.with_tracker(|tracker| tracker.view()) {
                            Ok(view) => download_presenter::render_download_view(
                                app_handle,
                                &view,
                                append_download_log,
                            ),
                            Err(error) => append_download_log(&error),
                        }
                    }
                }
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            let config = app_handle.state::<ShellState>().snapshot();
            app.manage(DownloadState::new(app_handle.clone()));

            let menu = match menu_setup::build_shell_menu(&app_handle, config.theme) {
                Ok(menu) => Some(menu),
                Err(error) => {
                    append_startup_log(&format!("failed to build shell menu: {error}"));
                    None
                }
            };

            main_window::build_main_window(&app_handle, &config, menu)?;
            append_startup_log(&format!("main window created for {}", config.last_url));
            splash_screen::show_splash_then_main(&app_handle, append_startup_log);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app_handle, event| {
            if let RunEvent::Exit = event {
                append_shutdown_log("desktop process exiting");
            }
        });
}
