//! Application shell: loads the event, hosts the join flow, owns the
//! committed selection and drives the debounced availability sync.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use egui::{Context, RichText, ScrollArea};

use crate::models::participant::{validate_name, ParticipantSession};
use crate::models::settings::Settings;
use crate::models::slot::{SelectionSet, TimeSlot};
use crate::services::axis::Axis;
use crate::services::config::{self, AppConfig};
use crate::services::database::Database;
use crate::services::heatmap::HeatmapGrid;
use crate::services::selection::{InputMode, SelectionEngine};
use crate::services::session::SessionService;
use crate::services::settings::SettingsService;
use crate::services::sync::{
    EventApiClient, EventSnapshot, JoinedParticipant, OutboundWrite, Revision, SyncQueue,
};
use crate::ui_egui::theme::GridTheme;
use crate::ui_egui::toast::ToastManager;
use crate::ui_egui::views::palette::{HeatmapPalette, SlotPalette};
use crate::ui_egui::views::{
    format_time_label, grid::render_availability_grid, heatmap::render_heatmap_grid,
    legend::{render_edit_legend, render_heatmap_legend},
    participant_list::render_participant_list,
};

/// Results arriving from worker threads, drained once per frame.
enum NetEvent {
    SnapshotLoaded(anyhow::Result<EventSnapshot>),
    Joined(anyhow::Result<JoinedParticipant>),
    WriteFinished {
        revision: Revision,
        result: anyhow::Result<EventSnapshot>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Edit,
    Heatmap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveState {
    Idle,
    Saving,
    Saved,
    Failed,
}

/// Everything that exists once the event snapshot has loaded.
struct EventView {
    snapshot: EventSnapshot,
    axis: Axis,
    engine: SelectionEngine,
    committed: SelectionSet,
    heatmap: HeatmapGrid,
    session: Option<ParticipantSession>,
    view_mode: ViewMode,
    name_input: String,
    joining: bool,
    sync: SyncQueue,
    save_state: SaveState,
}

impl EventView {
    fn rebuild_heatmap(&mut self) {
        self.heatmap = HeatmapGrid::from_index(
            &self.snapshot.availability,
            self.snapshot.total_participants,
        );
    }

    fn participant_names(&self) -> HashMap<String, String> {
        self.snapshot
            .participants
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect()
    }
}

enum ViewState {
    Loading,
    Failed(String),
    Ready(Box<EventView>),
}

pub struct MeetGridApp {
    slug: String,
    config: AppConfig,
    client: EventApiClient,
    database: &'static Database,
    settings: Settings,
    theme: GridTheme,
    toasts: ToastManager,
    events_tx: Sender<NetEvent>,
    events_rx: Receiver<NetEvent>,
    view: ViewState,
}

impl MeetGridApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        slug: String,
        config: AppConfig,
        client: EventApiClient,
    ) -> Self {
        let database = initialize_database();

        let settings_service = SettingsService::new(database);
        let settings = load_settings_or_default(&settings_service);

        let theme = GridTheme::for_settings(&settings);
        theme.apply_to_context(&cc.egui_ctx);

        let (events_tx, events_rx) = channel();
        spawn_fetch(
            client.clone(),
            slug.clone(),
            events_tx.clone(),
            cc.egui_ctx.clone(),
        );

        Self {
            slug,
            config,
            client,
            database,
            settings,
            theme,
            toasts: ToastManager::new(),
            events_tx,
            events_rx,
            view: ViewState::Loading,
        }
    }

    fn input_mode(&self) -> InputMode {
        if self.settings.compact_touch_layout {
            InputMode::TapToggle
        } else {
            InputMode::PointerDrag
        }
    }

    fn handle_net_event(&mut self, event: NetEvent, ctx: &Context) {
        match event {
            NetEvent::SnapshotLoaded(Ok(snapshot)) => self.apply_snapshot(snapshot),
            NetEvent::SnapshotLoaded(Err(err)) => {
                log::error!("Failed to load event '{}': {:#}", self.slug, err);
                if matches!(self.view, ViewState::Loading) {
                    self.view = ViewState::Failed(err.to_string());
                } else {
                    self.toasts.error("Nie udało się odświeżyć wydarzenia");
                }
            }
            NetEvent::Joined(result) => self.apply_join_result(result, ctx),
            NetEvent::WriteFinished { revision, result } => {
                self.apply_write_result(revision, result);
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: EventSnapshot) {
        if let ViewState::Ready(view) = &mut self.view {
            view.snapshot = snapshot;
            view.rebuild_heatmap();
            return;
        }

        let axis = match Axis::for_event(&snapshot.event) {
            Ok(axis) => axis,
            Err(err) => {
                log::error!("Event '{}' has an unusable grid: {}", self.slug, err);
                self.view = ViewState::Failed(err.to_string());
                return;
            }
        };

        let session = match SessionService::new(self.database).get(&self.slug) {
            Ok(session) => session,
            Err(err) => {
                log::warn!("Failed to load cached session: {:#}", err);
                None
            }
        };

        let committed = session
            .as_ref()
            .map(|s| on_axis_slots(&axis, s.slots.iter().copied()))
            .unwrap_or_default();

        let mut engine = SelectionEngine::new(axis.clone());
        engine.set_input_mode(self.input_mode());
        engine.set_disabled(session.is_none());

        let name_input = session
            .as_ref()
            .map(|s| s.name.clone())
            .or_else(|| self.config.default_name.clone())
            .unwrap_or_default();

        let mut view = EventView {
            snapshot,
            axis,
            engine,
            committed,
            heatmap: HeatmapGrid::default(),
            session,
            view_mode: ViewMode::Edit,
            name_input,
            joining: false,
            sync: SyncQueue::with_debounce(self.config.debounce_window()),
            save_state: SaveState::Idle,
        };
        view.rebuild_heatmap();
        self.view = ViewState::Ready(Box::new(view));
    }

    fn apply_join_result(&mut self, result: anyhow::Result<JoinedParticipant>, ctx: &Context) {
        let ViewState::Ready(view) = &mut self.view else {
            return;
        };
        view.joining = false;

        let participant = match result {
            Ok(participant) => participant,
            Err(err) => {
                log::error!("Join failed: {:#}", err);
                self.toasts.error("Nie udało się dołączyć");
                return;
            }
        };

        let saved = participant.saved_slots();
        if !saved.is_empty() {
            view.committed = on_axis_slots(&view.axis, saved);
        }

        let session = ParticipantSession {
            participant_id: participant.id,
            name: participant.name,
            slots: view.committed.iter().copied().collect(),
        };
        if let Err(err) = SessionService::new(self.database).save(&self.slug, &session) {
            log::warn!("Failed to cache session: {:#}", err);
        }

        view.session = Some(session);
        view.engine.set_disabled(false);
        self.toasts.success("Dołączyłeś do wydarzenia!");

        // Refresh the aggregate so the heatmap includes the new roster
        spawn_fetch(
            self.client.clone(),
            self.slug.clone(),
            self.events_tx.clone(),
            ctx.clone(),
        );
    }

    fn apply_write_result(
        &mut self,
        revision: Revision,
        result: anyhow::Result<EventSnapshot>,
    ) {
        let ViewState::Ready(view) = &mut self.view else {
            return;
        };
        view.sync.finish_write(revision);

        match result {
            Ok(snapshot) => {
                if !view.sync.response_is_current(revision) {
                    // A newer local edit exists; this response may not
                    // overwrite it. The pending write will refresh again.
                    log::debug!("Dropping stale availability ack (revision {})", revision);
                    return;
                }

                view.snapshot = snapshot;
                view.rebuild_heatmap();
                view.save_state = SaveState::Saved;

                if let Some(session) = &mut view.session {
                    session.slots = view.committed.iter().copied().collect();
                    if let Err(err) =
                        SessionService::new(self.database).save(&self.slug, session)
                    {
                        log::warn!("Failed to cache session slots: {:#}", err);
                    }
                }
            }
            Err(err) => {
                // Optimistic update: the local selection stays; the next
                // edit re-arms the debounce and writes the full set again.
                log::error!("Availability write failed: {:#}", err);
                self.toasts.error("Nie udało się zapisać zmian");
                if view.sync.response_is_current(revision) {
                    view.save_state = SaveState::Failed;
                }
            }
        }
    }

    fn tick_sync(&mut self, ctx: &Context) {
        let ViewState::Ready(view) = &mut self.view else {
            return;
        };
        let Some(session) = &view.session else {
            return;
        };

        if let Some(write) = view.sync.due_write() {
            view.save_state = SaveState::Saving;
            spawn_write(
                self.client.clone(),
                self.slug.clone(),
                session.participant_id.clone(),
                write,
                self.events_tx.clone(),
                ctx.clone(),
            );
        }

        if let Some(due_in) = view.sync.next_due_in(Instant::now()) {
            ctx.request_repaint_after(due_in + Duration::from_millis(10));
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            match &self.view {
                ViewState::Ready(view) => {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&view.snapshot.event.title).heading());
                        if let Some(description) = &view.snapshot.event.description {
                            ui.label(RichText::new(description).color(self.theme.text_secondary));
                        }
                        let event = &view.snapshot.event;
                        ui.label(
                            RichText::new(format!(
                                "{} – {}   •   {} – {}",
                                event.start_date.format("%d.%m.%Y"),
                                event.end_date.format("%d.%m.%Y"),
                                format_time_label(event.start_time, &self.settings.time_format),
                                format_time_label(event.end_time, &self.settings.time_format),
                            ))
                            .color(self.theme.text_secondary)
                            .size(11.0),
                        );
                    });
                }
                _ => {
                    ui.label(RichText::new("MeetGrid").heading());
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                self.render_settings_menu(ui);
                if let ViewState::Ready(view) = &self.view {
                    render_save_badge(ui, view.save_state, self.theme.accent);
                    ui.label(
                        RichText::new(format!(
                            "👥 {} uczestników",
                            view.snapshot.total_participants
                        ))
                        .color(self.theme.text_secondary),
                    );
                }
            });
        });
        ui.add_space(6.0);
    }

    fn render_settings_menu(&mut self, ui: &mut egui::Ui) {
        let mut use_system_theme = self.settings.use_system_theme;
        let mut dark = self.settings.theme == "Dark";
        let mut twelve_hour = self.settings.time_format == "12h";
        let mut compact = self.settings.compact_touch_layout;
        let mut changed = false;

        ui.menu_button("⚙", |ui| {
            changed |= ui.checkbox(&mut use_system_theme, "Motyw systemowy").changed();
            ui.add_enabled_ui(!use_system_theme, |ui| {
                changed |= ui.checkbox(&mut dark, "Ciemny motyw").changed();
            });
            changed |= ui.checkbox(&mut twelve_hour, "Zegar 12-godzinny").changed();
            changed |= ui
                .checkbox(&mut compact, "Układ dotykowy (stukanie zamiast przeciągania)")
                .changed();
        });

        if !changed {
            return;
        }

        self.settings.use_system_theme = use_system_theme;
        self.settings.theme = if dark { "Dark" } else { "Light" }.to_string();
        self.settings.time_format = if twelve_hour { "12h" } else { "24h" }.to_string();
        self.settings.compact_touch_layout = compact;

        if let Err(err) = SettingsService::new(self.database).update(&self.settings) {
            log::warn!("Failed to persist settings: {:#}", err);
        }

        self.theme = GridTheme::for_settings(&self.settings);
        self.theme.apply_to_context(ui.ctx());

        let mode = self.input_mode();
        if let ViewState::Ready(view) = &mut self.view {
            view.engine.set_input_mode(mode);
        }
    }
}

impl eframe::App for MeetGridApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let events: Vec<NetEvent> = self.events_rx.try_iter().collect();
        for event in events {
            self.handle_net_event(event, ctx);
        }

        self.tick_sync(ctx);

        egui::TopBottomPanel::top("meetgrid_header").show(ctx, |ui| {
            self.render_header(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.view {
            ViewState::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.label("Wczytywanie wydarzenia…");
                });
            }
            ViewState::Failed(message) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("Nie udało się wczytać wydarzenia: {}", message))
                            .color(egui::Color32::from_rgb(200, 80, 80)),
                    );
                });
            }
            ViewState::Ready(view) => {
                render_event_view(
                    ui,
                    view,
                    &self.theme,
                    &self.client,
                    &self.slug,
                    &self.events_tx,
                    &mut self.toasts,
                );
            }
        });

        self.toasts.render(ctx, self.theme.is_dark);
    }
}

// --- ready-state rendering ------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn render_event_view(
    ui: &mut egui::Ui,
    view: &mut EventView,
    theme: &GridTheme,
    client: &EventApiClient,
    slug: &str,
    events_tx: &Sender<NetEvent>,
    toasts: &mut ToastManager,
) {
    let slot_palette = SlotPalette::from_theme(theme);
    let heatmap_palette = HeatmapPalette::from_theme(theme);

    if view.session.is_none() {
        render_join_card(ui, view, client, slug, events_tx, toasts);
    } else {
        let name = view
            .session
            .as_ref()
            .map(|session| session.name.clone())
            .unwrap_or_default();
        ui.horizontal(|ui| {
            ui.label("Zalogowano jako:");
            ui.label(RichText::new(name).strong());
            ui.separator();
            ui.selectable_value(&mut view.view_mode, ViewMode::Edit, "Edytuj dostępność");
            ui.selectable_value(&mut view.view_mode, ViewMode::Heatmap, "Zobacz wszystkich");
        });
    }
    ui.add_space(8.0);

    let mut commit: Option<SelectionSet> = None;

    match view.view_mode {
        ViewMode::Edit => {
            ui.label(
                RichText::new("Kliknij i przeciągnij, aby zaznaczyć kiedy jesteś dostępny")
                    .color(theme.text_secondary)
                    .size(11.0),
            );
            render_edit_legend(ui, &slot_palette);
            ui.add_space(4.0);

            if !view.engine.is_disabled() {
                ui.horizontal(|ui| {
                    if ui.small_button("Zaznacz wszystko").clicked() {
                        commit = view.engine.select_all();
                    }
                    if ui.small_button("Wyczyść").clicked() {
                        commit = view.engine.clear_all();
                    }
                });
                ui.add_space(4.0);
            }

            let slots_per_hour = view.snapshot.event.slots_per_hour();
            ScrollArea::both()
                .id_source("edit_grid")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let response = render_availability_grid(
                        ui,
                        &mut view.engine,
                        &view.committed,
                        slots_per_hour,
                        &slot_palette,
                    );
                    if response.committed.is_some() {
                        commit = response.committed;
                    }
                });
        }
        ViewMode::Heatmap => {
            ui.label(
                RichText::new("Ciemniejszy kolor = więcej osób dostępnych")
                    .color(theme.text_secondary)
                    .size(11.0),
            );
            render_heatmap_legend(ui, &heatmap_palette);
            ui.add_space(4.0);

            let names = view.participant_names();
            ScrollArea::both()
                .id_source("heatmap_grid")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    render_heatmap_grid(
                        ui,
                        &view.axis,
                        &view.heatmap,
                        &names,
                        &heatmap_palette,
                        view.engine.input_mode() == InputMode::TapToggle,
                    );
                });

            ui.add_space(8.0);
            let current_id = view
                .session
                .as_ref()
                .map(|session| session.participant_id.clone());
            render_participant_list(
                ui,
                &view.snapshot.participants,
                current_id.as_deref(),
            );
        }
    }

    if let Some(next) = commit {
        view.committed = next;
        view.sync.commit(view.committed.clone());
    }
}

fn render_join_card(
    ui: &mut egui::Ui,
    view: &mut EventView,
    client: &EventApiClient,
    slug: &str,
    events_tx: &Sender<NetEvent>,
    toasts: &mut ToastManager,
) {
    ui.group(|ui| {
        ui.label(RichText::new("Dołącz do wydarzenia").strong());
        ui.label("Podaj swoje imię, aby zaznaczyć swoją dostępność");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut view.name_input)
                    .hint_text("Twoje imię")
                    .desired_width(220.0),
            );
            let submitted =
                edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let clicked = ui
                .add_enabled(!view.joining, egui::Button::new("Dołącz"))
                .clicked();

            if (clicked || submitted) && !view.joining {
                match validate_name(&view.name_input) {
                    Ok(()) => {
                        view.joining = true;
                        spawn_join(
                            client.clone(),
                            slug.to_string(),
                            view.name_input.trim().to_string(),
                            events_tx.clone(),
                            ui.ctx().clone(),
                        );
                    }
                    Err(reason) => {
                        log::warn!("Rejected join name: {}", reason);
                        toasts.error("Podaj swoje imię");
                    }
                }
            }

            if view.joining {
                ui.spinner();
            }
        });
    });
}

fn render_save_badge(ui: &mut egui::Ui, save_state: SaveState, accent: egui::Color32) {
    match save_state {
        SaveState::Idle => {}
        SaveState::Saving => {
            ui.label("Zapisywanie…");
            ui.spinner();
        }
        SaveState::Saved => {
            ui.label(RichText::new("✓ Zapisano").color(accent));
        }
        SaveState::Failed => {
            ui.label(RichText::new("✗ Nie zapisano").color(egui::Color32::from_rgb(200, 80, 80)));
        }
    }
}

// --- startup helpers ------------------------------------------------------

fn initialize_database() -> &'static Database {
    let db_path = config::database_path();
    let db_path = db_path.to_string_lossy();

    let db = Database::new(&db_path).expect("Failed to open local cache database");
    db.initialize_schema()
        .expect("Failed to initialize local cache schema");

    Box::leak(Box::new(db))
}

fn load_settings_or_default(settings_service: &SettingsService) -> Settings {
    match settings_service.get() {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("Failed to load settings, using defaults: {:#}", err);
            Settings::default()
        }
    }
}

/// Drop cached slots that fell off the axis (the event was edited since
/// the session was cached).
fn on_axis_slots<I>(axis: &Axis, slots: I) -> SelectionSet
where
    I: IntoIterator<Item = TimeSlot>,
{
    slots
        .into_iter()
        .filter(|slot| axis.slot_index(slot).is_some())
        .collect()
}

// --- worker threads -------------------------------------------------------

fn spawn_fetch(client: EventApiClient, slug: String, tx: Sender<NetEvent>, ctx: Context) {
    thread::spawn(move || {
        let result = client.fetch_event(&slug);
        if tx.send(NetEvent::SnapshotLoaded(result)).is_ok() {
            ctx.request_repaint();
        }
    });
}

fn spawn_join(
    client: EventApiClient,
    slug: String,
    name: String,
    tx: Sender<NetEvent>,
    ctx: Context,
) {
    thread::spawn(move || {
        let result = client.join(&slug, &name);
        if tx.send(NetEvent::Joined(result)).is_ok() {
            ctx.request_repaint();
        }
    });
}

/// Push the full selection, then refetch the aggregate for the heatmap.
fn spawn_write(
    client: EventApiClient,
    slug: String,
    participant_id: String,
    write: OutboundWrite,
    tx: Sender<NetEvent>,
    ctx: Context,
) {
    thread::spawn(move || {
        let result = client
            .put_availability(&slug, &participant_id, &write.slots)
            .and_then(|()| client.fetch_event(&slug));
        let event = NetEvent::WriteFinished {
            revision: write.revision,
            result,
        };
        if tx.send(event).is_ok() {
            ctx.request_repaint();
        }
    });
}
