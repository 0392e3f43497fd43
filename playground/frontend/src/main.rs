use std::cell::RefCell;
use std::rc::Rc;

use jsxlive::config::EditorConfig;
use jsxlive::examples::EXAMPLE_DATAS;
use jsxlive::platform::browser::{BabelTransform, MessageListener, request_console};
use jsxlive::preview::{PREVIEW_SANDBOX, PREVIEW_TITLE};
use jsxlive::session::{EditorSession, FileDownload};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use zoon::{eprintln, println, *};

mod host_storage;
mod logger;

use host_storage::HostStorage;

type Session = EditorSession<HostStorage, BabelTransform>;

static PLAYGROUND_TOML: &str = include_str!("../playground.toml");

const APP_BACKGROUND_GRADIENT: &str =
    "linear-gradient(155deg, #231746 0%, #141f33 48%, #0d323f 100%)";
const PREVIEW_HEIGHT_PX: u32 = 500;

fn shell_surface_color() -> Rgba {
    color!("rgba(13, 18, 30, 0.76)")
}

fn primary_surface_color() -> Rgba {
    color!("rgba(21, 27, 44, 0.92)")
}

fn primary_text_color() -> Rgba {
    color!("#f1f4ff")
}

fn muted_text_color() -> Rgba {
    color!("rgba(226, 232, 255, 0.7)")
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Tab {
    Editor,
    Preview,
    Console,
    Project,
    Examples,
}

impl Tab {
    const ALL: [Tab; 5] = [
        Tab::Editor,
        Tab::Preview,
        Tab::Console,
        Tab::Project,
        Tab::Examples,
    ];

    fn label(self) -> &'static str {
        match self {
            Tab::Editor => "Editor",
            Tab::Preview => "Preview",
            Tab::Console => "Console",
            Tab::Project => "Project",
            Tab::Examples => "Examples",
        }
    }
}

fn main() {
    logger::init(if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });
    start_app("app", Playground::new);
}

fn load_config() -> EditorConfig {
    EditorConfig::from_toml_str(PLAYGROUND_TOML).unwrap_or_else(|error| {
        eprintln!("Invalid playground.toml, using defaults: {error}");
        EditorConfig::default()
    })
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(error) = window.alert_with_message(message) {
            eprintln!("alert failed: {error:?}");
        }
    }
}

fn prompt(message: &str, default: &str) -> Option<String> {
    web_sys::window()?
        .prompt_with_message_and_default(message, default)
        .ok()
        .flatten()
        .filter(|answer| !answer.is_empty())
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Saves the file through a temporary object URL and `<a download>`.
fn download_file(download: &FileDownload) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(&download.contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/plain");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(JsValue::from)?;
    anchor.set_href(&url);
    anchor.set_download(&download.file_name);
    body.append_child(&anchor)?;
    anchor.click();
    web_sys::Url::revoke_object_url(&url)?;
    anchor.remove();
    Ok(())
}

fn tool_button(label: &'static str, on_press: impl FnMut() + 'static) -> impl Element {
    let hovered = Mutable::new(false);
    Button::new()
        .s(Padding::new().x(12).y(6))
        .s(RoundedCorners::all(12))
        .s(Font::new().size(13).weight(FontWeight::Medium).no_wrap())
        .s(Borders::all(
            Border::new().color(color!("rgba(88, 126, 194, 0.4)")).width(1),
        ))
        .s(Background::new().color_signal(hovered.signal().map_bool(
            || color!("rgba(36, 48, 72, 0.5)"),
            || color!("rgba(20, 28, 44, 0.4)"),
        )))
        .label(label)
        .on_hovered_change(move |is_hovered| hovered.set(is_hovered))
        .on_press(on_press)
}

#[derive(Clone)]
struct Playground {
    session: Rc<RefCell<Session>>,
    /// File names in project order
    file_names: Mutable<Rc<Vec<String>>>,
    /// Currently selected/edited file name
    active_file: Mutable<String>,
    /// Active file content for the code editor
    source_code: Mutable<String>,
    /// Preview document, empty when the last build failed
    compiled: Mutable<String>,
    error: Mutable<Option<String>>,
    console_lines: MutableVec<String>,
    auto_run: Mutable<bool>,
    active_tab: Mutable<Tab>,
    _message_listener: Rc<Option<MessageListener>>,
}

impl Playground {
    fn new() -> impl Element {
        let session = match EditorSession::open(
            load_config(),
            HostStorage::detect(),
            BabelTransform,
        ) {
            Ok(session) => Rc::new(RefCell::new(session)),
            Err(error) => {
                eprintln!("Failed to open the editor: {error}");
                return El::new()
                    .s(Font::new().color(color!("LightCoral")))
                    .child(format!("Failed to open the editor: {error}"))
                    .unify();
            }
        };

        let console_lines = MutableVec::new();

        // Console lines posted by the preview frame
        let message_listener = {
            let session = session.clone();
            let console_lines = console_lines.clone();
            MessageListener::new(move |data| {
                let mut session = session.borrow_mut();
                if session.receive_message(&data) {
                    console_lines
                        .lock_mut()
                        .replace_cloned(session.console().lines().to_vec());
                }
            })
        };
        let message_listener = match message_listener {
            Ok(listener) => Some(listener),
            Err(error) => {
                eprintln!("Console bridge unavailable: {error}");
                None
            }
        };

        let playground = Self {
            session,
            file_names: Mutable::new(Rc::new(Vec::new())),
            active_file: Mutable::new(String::new()),
            source_code: Mutable::new(String::new()),
            compiled: Mutable::new(String::new()),
            error: Mutable::new(None),
            console_lines,
            auto_run: Mutable::new(false),
            active_tab: Mutable::new(Tab::Editor),
            _message_listener: Rc::new(message_listener),
        };
        playground.sync();
        playground.root().unify()
    }

    /// Runs `action` on the session, then mirrors the session into the signals.
    fn act<R>(&self, action: impl FnOnce(&mut Session) -> R) -> R {
        let result = action(&mut self.session.borrow_mut());
        self.sync();
        result
    }

    fn sync(&self) {
        let session = self.session.borrow();
        let file_names: Vec<String> = session.files().names().map(str::to_string).collect();
        if self.file_names.lock_ref().as_slice() != file_names.as_slice() {
            self.file_names.set(Rc::new(file_names));
        }
        self.active_file.set_neq(session.active_file().to_string());
        self.source_code.set_neq(session.active_source().to_string());
        self.compiled.set_neq(session.compiled_output().to_string());
        self.error.set_neq(session.error().map(str::to_string));
        self.auto_run.set_neq(session.auto_run());
        if *self.console_lines.lock_ref() != *session.console().lines() {
            self.console_lines
                .lock_mut()
                .replace_cloned(session.console().lines().to_vec());
        }
    }

    fn add_file(&self) {
        let Some(name) = prompt("File name? (e.g. utils.js, Helper.jsx)", "") else {
            return;
        };
        if let Err(error) = self.act(|session| session.add_file(&name)) {
            alert(&error.to_string());
        }
    }

    fn rename_file(&self, file_name: &str) {
        let Some(new_name) = prompt("Rename file to:", file_name) else {
            return;
        };
        if let Err(error) = self.act(|session| session.rename_file(file_name, &new_name)) {
            alert(&error.to_string());
        }
    }

    fn delete_file(&self, file_name: &str) {
        if let Err(error) = self.act(|session| session.delete_file(file_name)) {
            alert(&error.to_string());
        }
    }

    fn select_file(&self, file_name: &str) {
        if let Err(error) = self.act(|session| session.select_file(file_name)) {
            eprintln!("Cannot select file: {error}");
        }
    }

    fn download_active(&self) {
        let download = self.session.borrow().download_active();
        if let Err(error) = download_file(&download) {
            eprintln!("Failed to download {}: {error:?}", download.file_name);
        }
    }

    fn save_project(&self) {
        // The borrow must end before the modal alert, which can let queued messages run
        let result = self.session.borrow().save_project();
        match result {
            Ok(()) => alert("Project saved!"),
            Err(error) => alert(&format!("Failed to save project: {error}")),
        }
    }

    fn load_project(&self) {
        if let Err(error) = self.act(|session| session.load_project()) {
            alert(&error.to_string());
        }
    }

    fn reset_project(&self) {
        if confirm("Reset all files to default?") {
            self.act(|session| session.reset_project());
        }
    }

    fn load_example(&self, name: &str) {
        if let Err(error) = self.act(|session| session.load_example(name)) {
            alert(&error.to_string());
        }
    }

    fn root(&self) -> impl Element + use<> {
        Stack::new()
            .s(Width::fill())
            .s(Height::fill())
            .layer(
                El::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .update_raw_el(|raw_el| raw_el.style("background", APP_BACKGROUND_GRADIENT)),
            )
            .update_raw_el({
                let this = self.clone();
                move |raw_el| {
                    raw_el.global_event_handler_with_options(
                        EventOptions::new().preventable().parents_first(),
                        move |event: events::KeyDown| {
                            if event.repeat() {
                                return;
                            }
                            if event.shift_key() && event.key() == "Enter" {
                                event.prevent_default();
                                this.act(|session| session.run());
                            }
                        },
                    )
                }
            })
            .layer(self.main_layout())
    }

    fn main_layout(&self) -> impl Element + use<> {
        Column::new()
            .s(Width::fill().max(1152))
            .s(Height::fill())
            .s(Align::new().center_x())
            .s(Padding::new().x(6).top(8).bottom(10))
            .s(Gap::new().y(8))
            .s(Font::new().color(primary_text_color()))
            .s(Scrollbars::both())
            .item(self.header_title())
            .item(self.tab_bar())
            .item(
                El::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .s(Scrollbars::both())
                    .s(Background::new().color(shell_surface_color()))
                    .s(RoundedCorners::all(24))
                    .s(Padding::all(10))
                    .child(
                        Column::new()
                            .s(Width::fill())
                            .s(Gap::new().y(8))
                            .item_signal(self.active_tab.signal().map({
                                let this = self.clone();
                                move |tab| this.tab_content(tab)
                            }))
                            // Kept mounted so console output arrives on every tab
                            .item(self.preview_panel()),
                    ),
            )
    }

    fn header_title(&self) -> impl Element + use<> {
        Row::new()
            .s(Align::new().center_y())
            .s(Gap::new().x(4))
            .s(
                Font::new()
                    .size(18)
                    .weight(FontWeight::SemiBold)
                    .family([FontFamily::new("JetBrains Mono"), FontFamily::Monospace])
                    .no_wrap(),
            )
            .item(El::new().s(Font::new().color(color!("#6cb6ff"))).child("JSX/TSX"))
            .item(El::new().s(Font::new().color(color!("#fcbf49"))).child("Live Editor"))
    }

    fn tab_bar(&self) -> impl Element + use<> {
        Row::new()
            .s(Width::fill())
            .s(Gap::new().x(6))
            .s(Padding::new().x(4).y(4))
            .s(Background::new().color(color!("rgba(8, 12, 22, 0.5)")))
            .s(RoundedCorners::all(16))
            .multiline()
            .items(Tab::ALL.map(|tab| self.tab_button(tab)))
    }

    fn tab_button(&self, tab: Tab) -> impl Element + use<> {
        let hovered = Mutable::new(false);
        let is_active = self.active_tab.signal().map(move |active| active == tab).broadcast();
        Button::new()
            .s(Padding::new().x(14).y(7))
            .s(RoundedCorners::all(12))
            .s(Font::new().size(14).weight(FontWeight::Medium).no_wrap())
            .s(Background::new().color_signal(map_ref! {
                let hovered = hovered.signal(),
                let is_active = is_active.signal() =>
                match (*is_active, *hovered) {
                    (true, _) => color!("rgba(60, 94, 148, 0.65)"),
                    (false, true) => color!("rgba(36, 48, 72, 0.5)"),
                    (false, false) => color!("rgba(20, 28, 44, 0.4)"),
                }
            }))
            .label(tab.label())
            .on_hovered_change(move |is_hovered| hovered.set(is_hovered))
            .on_press({
                let active_tab = self.active_tab.clone();
                move || active_tab.set_neq(tab)
            })
    }

    fn tab_content(&self, tab: Tab) -> Option<RawElOrText> {
        let content = match tab {
            Tab::Editor => self.editor_panel().unify(),
            Tab::Console => self.console_panel().unify(),
            Tab::Project => self.project_panel().unify(),
            Tab::Examples => self.examples_panel().unify(),
            Tab::Preview => return None,
        };
        Some(content)
    }

    fn editor_panel(&self) -> impl Element + use<> {
        Column::new()
            .s(Width::fill())
            .s(Gap::new().y(8))
            .item(self.editor_toolbar())
            .item(self.file_tabs_row())
            .item(self.code_editor_widget())
            .item_signal(self.error.signal_cloned().map(|error| {
                error.map(|message| {
                    El::new()
                        .s(Width::fill())
                        .s(Padding::all(8))
                        .s(RoundedCorners::all(8))
                        .s(Background::new().color(color!("rgba(255, 134, 134, 0.12)")))
                        .s(Font::new().size(12).color(color!("LightCoral")).family([FontFamily::Monospace]))
                        .update_raw_el(|raw_el| raw_el.style("white-space", "pre-wrap"))
                        .child(message)
                })
            }))
    }

    fn editor_toolbar(&self) -> impl Element + use<> {
        Row::new()
            .s(Gap::new().x(8).y(6))
            .s(Align::new().center_y())
            .multiline()
            .item(tool_button("+ File", {
                let this = self.clone();
                move || this.add_file()
            }))
            .item(tool_button("Beautify", {
                let this = self.clone();
                move || this.act(|session| session.beautify_active())
            }))
            .item(tool_button("Download", {
                let this = self.clone();
                move || this.download_active()
            }))
            .item(tool_button("Run", {
                let this = self.clone();
                move || this.act(|session| session.run())
            }))
            .item(self.auto_run_toggle())
    }

    fn auto_run_toggle(&self) -> impl Element + use<> {
        Button::new()
            .s(Padding::new().x(12).y(6))
            .s(RoundedCorners::all(999))
            .s(Font::new().size(12).weight(FontWeight::SemiBold).no_wrap())
            .s(Background::new().color_signal(self.auto_run.signal().map_bool(
                || color!("rgba(60, 140, 90, 0.5)"),
                || color!("rgba(26, 36, 58, 0.32)"),
            )))
            .label_signal(
                self.auto_run
                    .signal()
                    .map_bool(|| "Auto Run: ON", || "Auto Run: OFF"),
            )
            .on_press({
                let this = self.clone();
                move || {
                    let enabled = !this.auto_run.get();
                    this.act(|session| session.set_auto_run(enabled));
                }
            })
    }

    fn file_tabs_row(&self) -> impl Element + use<> {
        Row::new()
            .s(Width::fill())
            .s(Align::new().center_y())
            .s(Gap::new().x(6).y(6))
            .multiline()
            .items_signal_vec(
                self.file_names
                    .signal_cloned()
                    .map({
                        let this = self.clone();
                        move |file_names| {
                            file_names
                                .iter()
                                .cloned()
                                .map(|file_name| this.file_tab(file_name))
                                .collect::<Vec<_>>()
                        }
                    })
                    .to_signal_vec(),
            )
    }

    fn file_tab(&self, file_name: String) -> impl Element + use<> {
        let hovered = Mutable::new(false);
        let is_entry = self.session.borrow().project().is_entry(&file_name);
        let is_active_signal = {
            let file_name = file_name.clone();
            self.active_file
                .signal_cloned()
                .map(move |active| active == file_name)
                .broadcast()
        };

        let mut row = Row::new()
            .s(Padding::new().x(10).y(5))
            .s(Gap::new().x(6))
            .s(RoundedCorners::all(10))
            .s(Cursor::new(CursorIcon::Pointer))
            .s(Background::new().color_signal(map_ref! {
                let hovered = hovered.signal(),
                let is_active = is_active_signal.signal() =>
                match (*is_active, *hovered) {
                    (true, _) => color!("rgba(60, 94, 148, 0.65)"),
                    (false, true) => color!("rgba(36, 48, 72, 0.5)"),
                    (false, false) => color!("rgba(20, 28, 44, 0.4)"),
                }
            }))
            .s(Font::new().size(13).no_wrap().color_signal(
                is_active_signal
                    .signal()
                    .map_bool(|| color!("#f6f8ff"), muted_text_color),
            ))
            .on_hovered_change(move |is_hovered| hovered.set(is_hovered))
            .item(
                Button::new().label(file_name.clone()).on_press({
                    let this = self.clone();
                    let file_name = file_name.clone();
                    move || this.select_file(&file_name)
                }),
            );

        // The entry file can be edited but never renamed or removed
        if !is_entry {
            row = row
                .item(
                    Button::new()
                        .s(Font::new().color(color!("#6cb6ff")))
                        .update_raw_el(|raw_el| raw_el.attr("title", "Rename"))
                        .label("✎")
                        .on_press({
                            let this = self.clone();
                            let file_name = file_name.clone();
                            move || this.rename_file(&file_name)
                        }),
                )
                .item(
                    Button::new()
                        .s(Font::new().color(color!("LightCoral")))
                        .update_raw_el(|raw_el| raw_el.attr("title", "Delete"))
                        .label("✕")
                        .on_press({
                            let this = self.clone();
                            move || this.delete_file(&file_name)
                        }),
                );
        }
        row
    }

    fn code_editor_widget(&self) -> impl Element + use<> {
        El::new()
            .s(Width::fill())
            .s(Height::exact(300))
            .s(RoundedCorners::all(12))
            .s(Clip::both())
            .s(Background::new().color(color!("#0b1223")))
            .child(
                RawHtmlEl::new("textarea")
                    .attr("spellcheck", "false")
                    .style("width", "100%")
                    .style("height", "100%")
                    .style("resize", "none")
                    .style("border", "none")
                    .style("outline", "none")
                    .style("padding", "12px")
                    .style("box-sizing", "border-box")
                    .style("background", "transparent")
                    .style("color", "#e6ecff")
                    .style("font-family", "'JetBrains Mono', monospace")
                    .style("font-size", "14px")
                    .prop_signal("value", self.source_code.signal_cloned())
                    .event_handler({
                        let this = self.clone();
                        move |event: events::Input| {
                            if let Some(textarea) =
                                event.dyn_target::<web_sys::HtmlTextAreaElement>()
                            {
                                let source = textarea.value();
                                this.act(|session| session.edit_active(source));
                            }
                        }
                    }),
            )
    }

    fn preview_panel(&self) -> impl Element + use<> {
        El::new()
            .s(Width::fill())
            .s(Height::exact(PREVIEW_HEIGHT_PX))
            .s(RoundedCorners::all(24))
            .s(Clip::both())
            .s(Background::new().color(color!("white")))
            .update_raw_el({
                let is_visible = self.active_tab.signal().map(|tab| tab == Tab::Preview);
                move |raw_el| {
                    raw_el.style_signal(
                        "display",
                        is_visible.map(|visible| if visible { "block" } else { "none" }),
                    )
                }
            })
            .child(
                RawHtmlEl::new("iframe")
                    .attr("title", PREVIEW_TITLE)
                    .attr("sandbox", PREVIEW_SANDBOX)
                    .style("width", "100%")
                    .style("height", "100%")
                    .style("border", "none")
                    .attr_signal("srcdoc", self.compiled.signal_cloned())
                    .event_handler(|event: events::Load| {
                        let Some(frame) = event.dyn_target::<web_sys::HtmlIFrameElement>() else {
                            return;
                        };
                        if let Err(error) = request_console(&frame) {
                            eprintln!("Failed to reach the preview console: {error}");
                        }
                    }),
            )
    }

    fn console_panel(&self) -> impl Element + use<> {
        Column::new()
            .s(Width::fill())
            .s(Gap::new().y(8))
            .item(
                Column::new()
                    .s(Width::fill())
                    .s(Height::exact(288))
                    .s(Scrollbars::both())
                    .s(Padding::all(8))
                    .s(RoundedCorners::all(8))
                    .s(Background::new().color(color!("black")))
                    .s(Font::new().size(14).color(color!("#4ade80")).family([FontFamily::Monospace]))
                    .item_signal(self.console_lines.signal_vec_cloned().is_empty().map(|empty| {
                        empty.then(|| {
                            El::new()
                                .s(Font::new().color(color!("gray")))
                                .child("No console logs yet.")
                        })
                    }))
                    .items_signal_vec(
                        self.console_lines
                            .signal_vec_cloned()
                            .map(|line| El::new().child(line)),
                    ),
            )
            .item(tool_button("Clear Console", {
                let this = self.clone();
                move || this.act(|session| session.clear_console())
            }))
    }

    fn project_panel(&self) -> impl Element + use<> {
        Column::new()
            .s(Width::fill())
            .s(Gap::new().y(12))
            .item(
                Row::new()
                    .s(Gap::new().x(8))
                    .multiline()
                    .item(tool_button("💾 Save Project", {
                        let this = self.clone();
                        move || this.save_project()
                    }))
                    .item(tool_button("📂 Load Project", {
                        let this = self.clone();
                        move || this.load_project()
                    }))
                    .item(tool_button("🗑️ Reset Project", {
                        let this = self.clone();
                        move || this.reset_project()
                    })),
            )
            .item(
                El::new()
                    .s(Font::new().size(12).color(muted_text_color()))
                    .child("Project is auto-saved. You can also manually save or restore."),
            )
    }

    fn examples_panel(&self) -> impl Element + use<> {
        Column::new()
            .s(Width::fill())
            .s(Gap::new().y(12))
            .s(Background::new().color(primary_surface_color()))
            .s(RoundedCorners::all(16))
            .s(Padding::all(12))
            .item(
                Row::new()
                    .s(Gap::new().x(10).y(6))
                    .multiline()
                    .items(EXAMPLE_DATAS.iter().map(|example| {
                        let name = example.name;
                        tool_button(name, {
                            let this = self.clone();
                            move || {
                                println!("Loading example {name}");
                                this.load_example(name)
                            }
                        })
                    })),
            )
            .item(
                El::new()
                    .s(Font::new().size(12).color(muted_text_color()))
                    .child("Click an example to load it into the project (will overwrite current files)."),
            )
    }
}
