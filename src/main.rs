use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::spawn;

use anyhow::{Context as _, Result};
use eframe::{App, AppCreator, CreationContext, egui};
use eframe::egui::{Color32, Event, FontData, FontDefinitions, FontFamily, Key, Label, Widget};
use itertools::Itertools;
use log::{debug, error, info};

use crate::egui::{Context, RichText, Spinner, Ui, Visuals};
use lughat::{
    BookmarkOrder, BookmarkStore, CategoryFilter, Config, Entry, Source, SortOrder,
    categories_of, filter_bookmarks, filter_by_category, find_by_id, load_all, search, sort_results,
    suggest,
};

enum LughatState {
    Loading,
    Failed(String),
    Loaded(LoadedState),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    Search,
    Bookmarks,
}

/// Everything that, together with the query, determines the result list.
struct Filters {
    view: View,
    category: CategoryFilter,
    order: SortOrder,
    bookmark_order: BookmarkOrder,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            view: View::Search,
            category: CategoryFilter::All,
            order: SortOrder::Relevance,
            bookmark_order: BookmarkOrder::Newest,
        }
    }
}

impl Filters {
    fn next_category(&mut self, categories: &[String]) {
        self.category = match &self.category {
            CategoryFilter::All => categories.first()
                .map(|category| CategoryFilter::Only(category.clone()))
                .unwrap_or_default(),

            CategoryFilter::Only(current) => categories.iter()
                .skip_while(|category| *category != current)
                .nth(1)
                .map(|category| CategoryFilter::Only(category.clone()))
                .unwrap_or_default(),
        }
    }

    fn describe(&self) -> String {
        match self.view {
            View::Search => {
                let category = match &self.category {
                    CategoryFilter::All => "all",
                    CategoryFilter::Only(category) => category.as_str(),
                };

                format!("category: {}  sort: {}", category, self.order.label())
            }

            View::Bookmarks => format!("bookmarks  sort: {}", self.bookmark_order.label()),
        }
    }
}

struct LoadedState {
    all: Vec<Entry>,
    results: Vec<Entry>,
    suggestions: Vec<Entry>,
    categories: Vec<String>,
    selected: usize,
    /// Highlighted suggestion, if the user moved into the suggestion line.
    suggestion: Option<usize>,
    /// Id of the entry shown in the detail pane.
    detail: Option<String>,
    dirty: bool,
}

impl LoadedState {
    fn new(all: Vec<Entry>) -> Self {
        Self {
            all,
            results: Vec::new(),
            suggestions: Vec::new(),
            categories: Vec::new(),
            selected: 0,
            suggestion: None,
            detail: None,
            dirty: true,
        }
    }

    /// Recomputes suggestions and results for the current query. Only called
    /// when the query or one of the filters changed.
    fn recompute(&mut self, query: &str, filters: &Filters, bookmarks: &BookmarkStore) {
        let selected_id = self.results.get(self.selected).map(|entry| entry.id.clone());

        let results = match filters.view {
            View::Search => {
                let ranked = search(&self.all, query);
                self.categories = categories_of(&ranked);
                sort_results(filter_by_category(ranked, &filters.category), filters.order)
            }

            View::Bookmarks => {
                let bookmarked = bookmarks.resolve(&self.all, filters.bookmark_order);
                self.categories = Vec::new();
                filter_bookmarks(&bookmarked, query)
            }
        };

        self.suggestions = match filters.view {
            View::Search => suggest(&self.all, query).into_iter().cloned().collect_vec(),
            View::Bookmarks => Vec::new(),
        };

        debug!("query {:?}: {} results, {} suggestions", query, results.len(), self.suggestions.len());

        self.results = results.into_iter().cloned().collect_vec();

        self.selected = selected_id
            .and_then(|id| self.results.iter().position(|entry| entry.id == id))
            .unwrap_or_default();

        self.suggestion = None;
        self.dirty = false;
    }

    /// Moves the suggestion cursor. Moving up past the first suggestion
    /// leaves the suggestion line, moving down stops at the last one.
    fn move_suggestion(&mut self, steps: i32) {
        if self.suggestions.is_empty() {
            self.suggestion = None;
            return;
        }

        let current = self.suggestion.map_or(-1, |idx| idx as i32);
        let last = self.suggestions.len() as i32 - 1;
        let next = (current + steps).clamp(-1, last);

        self.suggestion = usize::try_from(next).ok();
    }

    fn highlighted_suggestion(&self) -> Option<&Entry> {
        self.suggestion.and_then(|idx| self.suggestions.get(idx))
    }
}

/// The bookmark store together with the last outcome worth showing to the
/// user. Save and export failures end up in `status` as well as the log.
struct Shelf {
    bookmarks: BookmarkStore,
    export_path: PathBuf,
    status: Option<String>,
}

impl Shelf {
    fn new(bookmarks: BookmarkStore, export_path: PathBuf) -> Self {
        Self { bookmarks, export_path, status: None }
    }

    fn toggle(&mut self, id: &str) {
        let bookmarked = self.bookmarks.toggle(id);
        info!("bookmark {:?} {}", id, if bookmarked { "added" } else { "removed" });
        self.save();
    }

    fn clear(&mut self) {
        info!("clearing {} bookmarks", self.bookmarks.len());
        self.bookmarks.clear();
        self.save();
    }

    fn save(&mut self) {
        match self.bookmarks.save() {
            Ok(()) => self.status = None,
            Err(err) => {
                error!("failed to save bookmarks: {err}");
                self.status = Some(format!("failed to save bookmarks: {err}"));
            }
        }
    }

    fn export(&mut self, entries: &[Entry]) {
        match export_bookmarks(&self.bookmarks, entries, &self.export_path) {
            Ok(()) => {
                info!("exported {} bookmarks to {:?}", self.bookmarks.len(), self.export_path);
                self.status = Some(format!(
                    "exported {} bookmarks to {}",
                    self.bookmarks.len(),
                    self.export_path.display(),
                ));
            }

            Err(err) => {
                error!("{err:#}");
                self.status = Some(format!("{err:#}"));
            }
        }
    }
}

struct LughatApp {
    query: String,
    filters: Filters,
    state: Arc<Mutex<LughatState>>,
    sources: Vec<Arc<dyn Source>>,
    shelf: Shelf,
}

fn lock(state: &Mutex<LughatState>) -> MutexGuard<'_, LughatState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LughatApp {
    pub fn new(sources: Vec<Arc<dyn Source>>, bookmarks: BookmarkStore, export_path: PathBuf) -> Self {
        Self {
            query: String::new(),
            filters: Filters::default(),
            state: Arc::new(LughatState::Loading.into()),
            sources,
            shelf: Shelf::new(bookmarks, export_path),
        }
    }

    fn handle_events(&mut self, ctx: &Context) {
        let events = ctx.input(|input| input.events.clone());

        let mut guard = lock(&self.state);

        let mut require_update = false;
        let mut move_steps: i32 = 0;
        let mut suggestion_steps: i32 = 0;
        let mut open_detail = false;
        let mut toggle_bookmark = false;
        let mut export = false;
        let mut clear_bookmarks = false;
        let mut next_category = false;
        let mut quit = false;

        for event in &events {
            match event {
                Event::Text(t) => {
                    self.query += t;
                    require_update = true;
                }

                Event::Key { key: Key::Backspace, pressed: true, .. } => {
                    if let Some((pos, _)) = self.query.char_indices().last() {
                        self.query.remove(pos);
                        require_update = true;
                    }
                }

                Event::Key { key: Key::W, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    if let Some(pos) = self.query.trim_end().rfind(' ') {
                        self.query.truncate(pos + 1);
                    } else {
                        self.query.truncate(0);
                    }

                    require_update = true;
                }

                Event::Key { key: Key::B, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    toggle_bookmark = true;
                }

                Event::Key { key: Key::E, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    export = true;
                }

                Event::Key { key: Key::D, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    clear_bookmarks = self.filters.view == View::Bookmarks;
                }

                Event::Key { key: Key::F, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    next_category = true;
                }

                Event::Key { key: Key::S, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    match self.filters.view {
                        View::Search => self.filters.order = self.filters.order.next(),
                        View::Bookmarks => self.filters.bookmark_order = self.filters.bookmark_order.next(),
                    }

                    require_update = true;
                }

                Event::Key { key: Key::Tab, pressed: true, .. } => {
                    self.filters.view = match self.filters.view {
                        View::Search => View::Bookmarks,
                        View::Bookmarks => View::Search,
                    };

                    require_update = true;
                }

                Event::Key { key: Key::Escape, pressed: true, .. } => {
                    quit = true;
                }

                Event::Key { key: Key::Enter, pressed: true, .. } => {
                    open_detail = true;
                }

                Event::Key { key: Key::ArrowUp, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    suggestion_steps -= 1;
                }

                Event::Key { key: Key::ArrowDown, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    suggestion_steps += 1;
                }

                Event::Key { key: Key::ArrowUp, pressed: true, .. } => {
                    move_steps -= 1;
                }

                Event::Key { key: Key::ArrowDown, pressed: true, .. } => {
                    move_steps += 1;
                }

                _ => ()
            }
        }

        let state = match &mut *guard {
            LughatState::Loaded(state) => state,
            _ => {
                if quit {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }

                return;
            }
        };

        if quit {
            // escape leaves the suggestion line first, then the detail pane
            if state.suggestion.take().is_none() && state.detail.take().is_none() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }

        if open_detail {
            if let Some(entry) = state.highlighted_suggestion() {
                self.query = entry.word.clone();
                open_detail = false;
                require_update = true;
            }
        }

        if next_category {
            self.filters.next_category(&state.categories);
            require_update = true;
        }

        if toggle_bookmark {
            if let Some(selected) = state.results.get(state.selected) {
                self.shelf.toggle(&selected.id);
                require_update |= self.filters.view == View::Bookmarks;
            }
        }

        if clear_bookmarks {
            self.shelf.clear();
            require_update = true;
        }

        if export {
            self.shelf.export(&state.all);
        }

        if require_update || state.dirty {
            state.recompute(&self.query, &self.filters, &self.shelf.bookmarks);
        }

        if suggestion_steps != 0 {
            state.move_suggestion(suggestion_steps);
        }

        if !state.results.is_empty() {
            state.selected = (state.selected as i32 + move_steps).rem_euclid(state.results.len() as _) as _;
        }

        if open_detail {
            state.detail = state.results.get(state.selected).map(|entry| entry.id.clone());
        }
    }

    fn paint(&self, ctx: &Context) {
        let guard = lock(&self.state);
        let state: &LughatState = &guard;

        if let LughatState::Loaded(loaded) = state {
            if let Some(entry) = loaded.detail.as_deref().and_then(|id| find_by_id(&loaded.all, id)) {
                egui::SidePanel::right("detail")
                    .min_width(320.0)
                    .show(ctx, |ui| paint_detail(ui, entry, self.shelf.bookmarks.contains(&entry.id)));
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            // make it all monospaced
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);

            // and let no text wrap
            ui.style_mut().wrap = Some(false);

            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.set_height(32.0);
                    let prompt = match self.filters.view {
                        View::Search => "> ",
                        View::Bookmarks => "* ",
                    };

                    let query_str = String::from(prompt) + &self.query;
                    Label::new(RichText::new(query_str).color(Color32::GOLD)).ui(ui);
                });

                if let LughatState::Loaded(state) = state {
                    if !state.suggestions.is_empty() {
                        ui.horizontal(|ui| {
                            for (idx, entry) in state.suggestions.iter().enumerate() {
                                let color = if state.suggestion == Some(idx) {
                                    Color32::WHITE
                                } else {
                                    Color32::DARK_GRAY
                                };

                                let text = format!("{} ({})", entry.word, entry.roman);
                                Label::new(RichText::new(text).color(color)).ui(ui);
                            }
                        });
                    }
                }

                ui.separator();

                match state {
                    LughatState::Loading => {
                        ui.centered_and_justified(|ui| {
                            ui.add(Spinner::new().size(32.0));
                        });
                    }

                    LughatState::Failed(message) => {
                        Label::new(RichText::new(message).color(Color32::RED)).ui(ui);
                    }

                    LughatState::Loaded(state) => {
                        let status = format!("{} results  {}", state.results.len(), self.filters.describe());
                        Label::new(RichText::new(status).color(Color32::DARK_GRAY)).ui(ui);

                        if let Some(message) = &self.shelf.status {
                            Label::new(RichText::new(message).color(Color32::GOLD)).ui(ui);
                        }

                        let rows = (ui.available_height() / 28.0).floor() as usize;
                        let items_count = state.results.len();

                        let items_iter = state.results.iter()
                            .enumerate()
                            .skip(state.selected.saturating_sub(rows / 2).min(items_count.saturating_sub(rows)))
                            .take(rows);

                        for (idx, entry) in items_iter {
                            let selected = state.selected == idx;
                            let color: Color32 = if selected { Color32::WHITE } else { Color32::GRAY };
                            let marker = if self.shelf.bookmarks.contains(&entry.id) { "*" } else { " " };

                            let text = format!(
                                "{} {}  {}  {}",
                                marker,
                                entry.word,
                                entry.roman,
                                entry.gloss().unwrap_or_default(),
                            );

                            ui.horizontal(|ui| {
                                ui.set_height(24.0);
                                Label::new(RichText::new(text).color(color)).ui(ui);
                            });
                        }
                    }
                }
            })
        });
    }
}

fn paint_detail(ui: &mut Ui, entry: &Entry, bookmarked: bool) {
    ui.heading(RichText::new(&entry.word).size(28.0));
    ui.label(RichText::new(&entry.roman).color(Color32::GOLD));

    if !entry.pronunciation.is_empty() {
        ui.label(format!("/{}/", entry.pronunciation));
    }

    if bookmarked {
        ui.label(RichText::new("bookmarked").color(Color32::GOLD));
    }

    let sections = [
        ("Definitions", &entry.definitions),
        ("Examples", &entry.examples),
        ("Synonyms", &entry.synonyms),
        ("Categories", &entry.categories),
        ("Tags", &entry.tags),
    ];

    for (title, values) in sections {
        if values.is_empty() {
            continue;
        }

        ui.separator();
        ui.strong(title);

        for (idx, value) in values.iter().enumerate() {
            ui.label(format!("{}. {}", idx + 1, value));
        }
    }
}

fn export_bookmarks(bookmarks: &BookmarkStore, entries: &[Entry], path: &Path) -> Result<()> {
    let fp = File::create(path)
        .with_context(|| format!("failed to create export file {:?}", path))?;

    bookmarks.export(entries, BufWriter::new(fp))
        .with_context(|| format!("failed to export bookmarks to {:?}", path))?;

    Ok(())
}

impl App for LughatApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_events(ctx);
        self.paint(ctx);
    }
}

/// Adds the given font as a fallback for every family, so that source-script
/// headwords render even though the default egui fonts lack those glyphs.
fn install_font(ctx: &Context, font: Vec<u8>) {
    let mut fonts = FontDefinitions::default();
    fonts.font_data.insert("script".into(), FontData::from_owned(font));

    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push("script".into());
    }

    ctx.set_fonts(fonts);
}

fn create_app(cc: &CreationContext<'_>, app: LughatApp, font: Option<Vec<u8>>) -> Box<dyn App> {
    cc.egui_ctx.set_visuals(Visuals::dark());

    if let Some(font) = font {
        install_font(&cc.egui_ctx, font);
    }

    let ctx = cc.egui_ctx.clone();
    let state_arc = Arc::clone(&app.state);

    let sources = app.sources.clone();

    spawn(move || {
        let loaded = match load_all(&sources) {
            Ok(entries) => {
                info!("dictionary ready with {} entries", entries.len());
                LughatState::Loaded(LoadedState::new(entries))
            }

            Err(err) => {
                error!("failed to load dictionary: {err}");
                LughatState::Failed(err.to_string())
            }
        };

        *lock(&state_arc) = loaded;

        ctx.request_repaint();
    });

    Box::new(app)
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env().context("failed to load configuration")?;

    let bookmarks = BookmarkStore::open(&config.bookmarks_path)
        .context("failed to open bookmark store")?;

    let font = config.font_path.as_deref()
        .map(fs::read)
        .transpose()
        .context("failed to read font")?;

    let export_path = config.bookmarks_path.with_file_name("bookmarks-export.json");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_always_on_top()
            .with_decorations(false)
            .with_resizable(false)
            .with_inner_size([960.0, 560.0]),
        ..Default::default()
    };

    let app = LughatApp::new(config.sources(), bookmarks, export_path);
    let app_name = "lughat";
    let app_creator: AppCreator = Box::new(move |ctx| create_app(ctx, app, font));

    eframe::run_native(app_name, native_options, app_creator)
        .map_err(|err| anyhow::anyhow!(err.to_string()))
}
