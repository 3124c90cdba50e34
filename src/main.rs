#![allow(non_snake_case)]

mod components;
mod error;
mod models;
mod services;
mod table;
#[cfg(test)]
mod testing;

use dioxus::prelude::*;

use crate::components::data_table::TableSection;
use crate::services::config::load_config;

fn main() {
    dioxus_logger::init(tracing::Level::INFO).expect("failed to init logger");
    launch();
}

#[cfg(feature = "desktop")]
fn launch() {
    use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

    let window_builder = WindowBuilder::new()
        .with_title("REST Table")
        .with_inner_size(LogicalSize::new(900.0, 640.0));

    let config = Config::new().with_window(window_builder);

    LaunchBuilder::desktop().with_cfg(config).launch(App);
}

#[cfg(not(feature = "desktop"))]
fn launch() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // 每个表格实例持有自己的配置，互不影响
    let config = use_signal(load_config);

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }

        div { class: "app-container",
            for table in config.read().tables.iter() {
                TableSection { key: "{table.container}", config: table.clone() }
            }
        }
    }
}
