#![forbid(unsafe_code)]

//! The board model.
//!
//! [`LabModel`] owns the entity store and every piece of interaction state.
//! Pointer events feed the drag tracker; a finished drag is resolved against
//! the store and, when it is a real move, parked in a single-slot debouncer.
//! Each tick polls the debouncer, re-resolves the parked move against the
//! store as it is now, and dispatches it to the gateway on a background task.
//!
//! # Move pipeline
//!
//! ```text
//! Down ─▶ PressArm ─(threshold)─▶ DragSession::start
//! Drag ─▶ DragSession::over(target under pointer)
//! Up   ─▶ DragSession::end ─▶ resolve_drop ─▶ Debouncer::call_at
//! Tick ─▶ Debouncer::poll_at ─▶ resolve again ─▶ Cmd::task("move")
//! Msg::Moved ─▶ EntityStore::apply_move_result ─▶ Cmd::task("insult")
//! ```
//!
//! # Invariants
//!
//! 1. The store changes only when a gateway call succeeds.
//! 2. Every dispatched move carries a sequence number; a response older than
//!    the last one applied for the same character is dropped, as is any
//!    response for a character that has since been stolen.
//! 3. At most one steal is in flight.
//! 4. `in_flight` counts issued tasks whose result message has not arrived.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Drop on own container | Hint toast, no call |
//! | Drop on trophy column or unknown target | No call (hint for trophies) |
//! | Move fails | Error toast, store unchanged, no retry |
//! | Parked move's target dimension vanished | Hint toast, no call |
//! | Insult after move fails | Logged at debug, nothing shown |
//! | Steal finds nobody | Error toast, store unchanged |
//! | Initial load fails | Error panel until `r` retries |

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use portal_core::buffer::Buffer;
use portal_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use portal_core::geometry::Rect;
use portal_core::style::{Color, Style};
use portal_core::text::{display_width, truncate_with_ellipsis};
use portal_gateway::{Gateway, GatewayError, Insult, StealOutcome};
use portal_model::dimension::REGULAR_DIMENSIONS;
use portal_model::{
    Character, DimensionId, DragConfig, DragSession, DropRelease, DropTargetId, EntityId,
    EntityStore, ImageCache, MovePlan, NoOpReason, PressArm, Resolution, resolve_drop,
};
use portal_runtime::{Clock, Cmd, DEFAULT_DEBOUNCE, Debouncer, Model};
use portal_widgets::{
    Banner, ColumnHit, ColumnScroll, ColumnVisual, DimensionColumn, Severity, ToastQueue,
    ToastStack, Widget,
};
use tracing::{debug, info, warn};

use crate::board::{BoardLayout, item_count};

/// How often the runtime delivers [`Event::Tick`].
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Rick Prime's lines, used in turn after each steal.
pub const RICK_PRIME_TAUNTS: [&str; 4] = [
    "Rick Prime took them. Nothing could be done.",
    "Rick Prime strikes again. Pathetic.",
    "Rick Prime stole them. That one was my favorite.",
    "Rick Prime took them. The multiverse is cruel.",
];

pub const SAME_CONTAINER_HINT: &str = "Drop on another dimension to move it and hear from Rick";

pub const TROPHY_DROP_HINT: &str = "Only Rick Prime puts characters in his dimension";

/// Shown when a parked move's destination disappeared before it was sent.
pub const TARGET_GONE_HINT: &str = "That dimension is gone, so the move was dropped";

const TITLE: &str = "Portal Lab";

const FOOTER_HELP: &str =
    "drag cards between dimensions · s steal · ←/→ focus · PgUp/PgDn scroll · r retry · q quit";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabConfig {
    /// Quiet period before a resolved move is sent.
    pub debounce: Duration,
    pub drag: DragConfig,
    pub tick: Duration,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            drag: DragConfig::default(),
            tick: TICK_INTERVAL,
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Msg {
    Event(Event),
    Loaded(Result<Vec<Character>, GatewayError>),
    Moved {
        seq: u64,
        plan: MovePlan,
        result: Result<Character, GatewayError>,
    },
    /// Flavor text following a successful move.
    Insulted(Result<Insult, GatewayError>),
    Stolen(Result<StealOutcome, GatewayError>),
    /// Flavor text following a successful steal.
    Taunted {
        taunt: &'static str,
        result: Result<Insult, GatewayError>,
    },
    ImageLoaded {
        url: String,
        result: Result<usize, GatewayError>,
    },
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The initial load failed with this message.
    Failed(String),
}

// ---------------------------------------------------------------------------
// LabModel
// ---------------------------------------------------------------------------

pub struct LabModel {
    gateway: Arc<dyn Gateway>,
    clock: Arc<dyn Clock>,
    images: ImageCache,
    config: LabConfig,

    store: EntityStore,
    load: LoadState,

    drag: DragSession,
    press: Option<PressArm>,
    moves: Debouncer<MovePlan>,
    next_seq: u64,
    applied_seq: HashMap<EntityId, u64>,

    in_flight: usize,
    stealing: bool,
    next_taunt: usize,

    toasts: ToastQueue,
    scroll: HashMap<DimensionId, ColumnScroll>,
    focus: usize,
    size: (u16, u16),
}

impl LabModel {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        images: ImageCache,
        clock: Arc<dyn Clock>,
        config: LabConfig,
    ) -> Self {
        Self {
            gateway,
            clock,
            images,
            config,
            store: EntityStore::with_pinned_containers(REGULAR_DIMENSIONS),
            load: LoadState::Loading,
            drag: DragSession::new(),
            press: None,
            moves: Debouncer::new(config.debounce),
            next_seq: 1,
            applied_seq: HashMap::new(),
            in_flight: 0,
            stealing: false,
            next_taunt: 0,
            toasts: ToastQueue::new(),
            scroll: HashMap::new(),
            focus: 0,
            size: (0, 0),
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    /// The move waiting out its debounce window.
    pub fn pending_move(&self) -> Option<&MovePlan> {
        self.moves.peek()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_stealing(&self) -> bool {
        self.stealing
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn scroll_offset(&self, dimension: &DimensionId) -> u32 {
        self.scroll.get(dimension).map_or(0, ColumnScroll::offset)
    }

    /// Board geometry for the last reported terminal size.
    pub fn layout(&self) -> BoardLayout {
        BoardLayout::compute(Rect::from_size(self.size.0, self.size.1), &self.store)
    }

    // ---- tasks ----

    /// Run `f` on a background task, counting it as in flight.
    fn spawn<F>(&mut self, name: &str, f: F) -> Cmd<Msg>
    where
        F: FnOnce(&dyn Gateway) -> Msg + Send + 'static,
    {
        self.in_flight += 1;
        let gateway = Arc::clone(&self.gateway);
        Cmd::task_named(name, move || f(gateway.as_ref()))
    }

    fn task_finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn request_load(&mut self) -> Cmd<Msg> {
        self.load = LoadState::Loading;
        self.spawn("load", |gw| Msg::Loaded(gw.list_characters()))
    }

    fn prefetch_images(&mut self) -> Cmd<Msg> {
        let urls = self.images.pending(
            self.store
                .characters()
                .chain(self.store.trophies())
                .filter_map(|c| c.image_url.as_deref()),
        );
        debug!(count = urls.len(), "prefetching portraits");
        let cmds = urls
            .into_iter()
            .map(|url| {
                self.spawn("image", move |gw| {
                    let result = gw.fetch_image(&url);
                    Msg::ImageLoaded { url, result }
                })
            })
            .collect();
        Cmd::batch(cmds)
    }

    fn dispatch_move(&mut self, queued: MovePlan) -> Cmd<Msg> {
        // The store may have changed while the move waited.
        let target = DropTargetId::Container(queued.to.clone());
        let plan = match resolve_drop(&self.store, &queued.entity, Some(&target)) {
            Resolution::Move(plan) => plan,
            Resolution::Unresolved => {
                info!(entity = %queued.entity, to = %queued.to, "queued move target gone");
                self.toasts
                    .push_at(TARGET_GONE_HINT, Severity::Hint, self.clock.now());
                return Cmd::none();
            }
            other => {
                debug!(entity = %queued.entity, ?other, "queued move no longer applies");
                return Cmd::none();
            }
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        info!(entity = %plan.entity, from = %plan.from, to = %plan.to, seq, "dispatching move");
        self.spawn("move", move |gw| {
            let result = gw.move_character(&plan.entity, &plan.to);
            Msg::Moved { seq, plan, result }
        })
    }

    fn steal(&mut self) -> Cmd<Msg> {
        if self.stealing {
            debug!("steal already in flight");
            return Cmd::none();
        }
        self.stealing = true;
        info!("rick prime steal requested");
        self.spawn("steal", |gw| Msg::Stolen(gw.steal_random_character()))
    }

    // ---- results ----

    fn on_loaded(&mut self, result: Result<Vec<Character>, GatewayError>) -> Cmd<Msg> {
        match result {
            Ok(characters) => {
                info!(count = characters.len(), "characters loaded");
                self.store.load(characters);
                self.load = LoadState::Ready;
                self.clamp_view();
                self.prefetch_images()
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "initial load failed");
                self.load = LoadState::Failed(err.user_message());
                Cmd::none()
            }
        }
    }

    fn on_moved(
        &mut self,
        seq: u64,
        plan: MovePlan,
        result: Result<Character, GatewayError>,
    ) -> Cmd<Msg> {
        let now = self.clock.now();
        let updated = match result {
            Ok(updated) => updated,
            Err(err) => {
                warn!(entity = %plan.entity, to = %plan.to, kind = err.kind(), error = %err, "move failed");
                self.toasts.push_at(err.user_message(), Severity::Error, now);
                return Cmd::none();
            }
        };

        if let Some(&last) = self.applied_seq.get(&updated.id)
            && last > seq
        {
            warn!(entity = %updated.id, seq, last, "stale move response discarded");
            return Cmd::none();
        }
        if self.store.trophy(updated.id.as_str()).is_some() {
            warn!(entity = %updated.id, seq, "move response for a stolen character discarded");
            return Cmd::none();
        }
        self.applied_seq.insert(updated.id.clone(), seq);

        let message = format!("{} moved to {}", updated.name, updated.current_dimension);
        info!(entity = %updated.id, to = %updated.current_dimension, seq, "move applied");
        self.store.apply_move_result(updated);
        self.clamp_view();
        self.toasts.push_at(message, Severity::Success, now);
        self.spawn("insult", |gw| Msg::Insulted(gw.fetch_random_insult()))
    }

    fn on_insulted(&mut self, result: Result<Insult, GatewayError>) -> Cmd<Msg> {
        match result {
            Ok(insult) => {
                self.toasts.push_at(insult.text, Severity::Info, self.clock.now());
            }
            Err(err) => debug!(kind = err.kind(), error = %err, "insult fetch failed"),
        }
        Cmd::none()
    }

    fn on_stolen(&mut self, result: Result<StealOutcome, GatewayError>) -> Cmd<Msg> {
        self.stealing = false;
        let now = self.clock.now();
        let StealOutcome { character, stone } = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "steal failed");
                self.toasts.push_at(err.user_message(), Severity::Error, now);
                return Cmd::none();
            }
        };

        info!(entity = %character.id, from = %stone.dimension, "character stolen");
        let message = format!("Rick Prime stole {}! Ha! Pathetic!", character.name);
        self.drop_pending_for(&character.id);
        self.store.apply_steal_result(character, stone);
        self.clamp_view();
        self.toasts.push_at(message, Severity::Success, now);

        let taunt = RICK_PRIME_TAUNTS[self.next_taunt % RICK_PRIME_TAUNTS.len()];
        self.next_taunt += 1;
        self.spawn("insult", move |gw| Msg::Taunted {
            taunt,
            result: gw.fetch_random_insult(),
        })
    }

    fn on_taunted(&mut self, taunt: &str, result: Result<Insult, GatewayError>) -> Cmd<Msg> {
        let message = match result {
            Ok(insult) => format!("{taunt} — {}", insult.text),
            Err(err) => {
                debug!(kind = err.kind(), error = %err, "insult fetch failed");
                taunt.to_string()
            }
        };
        self.toasts.push_at(message, Severity::Info, self.clock.now());
        Cmd::none()
    }

    fn on_image(&mut self, url: String, result: Result<usize, GatewayError>) -> Cmd<Msg> {
        match result {
            Ok(bytes) => {
                debug!(%url, bytes, "portrait cached");
                self.images.insert(url);
            }
            Err(err) => debug!(%url, kind = err.kind(), "portrait fetch failed"),
        }
        Cmd::none()
    }

    /// A stolen character can no longer be moved; forget its parked move.
    fn drop_pending_for(&mut self, id: &EntityId) {
        if self.moves.peek().is_some_and(|plan| &plan.entity == id) {
            self.moves.cancel();
        }
    }

    // ---- input ----

    fn handle_event(&mut self, event: Event) -> Cmd<Msg> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize { width, height } => {
                self.size = (width, height);
                self.clamp_view();
                Cmd::none()
            }
            Event::Focus(false) => {
                self.cancel_drag();
                Cmd::none()
            }
            Event::Focus(true) => Cmd::none(),
            Event::Tick => self.on_tick(),
        }
    }

    fn on_tick(&mut self) -> Cmd<Msg> {
        let now = self.clock.now();
        self.toasts.prune_at(now);
        match self.moves.poll_at(now) {
            Some(plan) => self.dispatch_move(plan),
            None => Cmd::none(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if key.kind == KeyEventKind::Release {
            return Cmd::none();
        }
        if key.is_char('q') || (key.ctrl() && key.is_char('c')) {
            return Cmd::quit();
        }
        if key.code == KeyCode::Escape {
            self.cancel_drag();
            return Cmd::none();
        }
        match self.load {
            LoadState::Failed(_) if key.is_char('r') => return self.request_load(),
            LoadState::Ready => {}
            _ => return Cmd::none(),
        }

        let columns = self.layout().columns.len();
        match key.code {
            KeyCode::Char('s') => return self.steal(),
            KeyCode::Left | KeyCode::BackTab => {
                self.focus = self.focus.checked_sub(1).unwrap_or(columns.saturating_sub(1));
            }
            KeyCode::Right | KeyCode::Tab => {
                self.focus = if self.focus + 1 >= columns { 0 } else { self.focus + 1 };
            }
            KeyCode::Up => self.scroll_column(self.focus, |s, n, vp| s.scroll_rows(-1, n, vp)),
            KeyCode::Down => self.scroll_column(self.focus, |s, n, vp| s.scroll_rows(1, n, vp)),
            KeyCode::PageUp => self.scroll_column(self.focus, ColumnScroll::page_up),
            KeyCode::PageDown => self.scroll_column(self.focus, ColumnScroll::page_down),
            KeyCode::Home => self.scroll_column(self.focus, |s, _, _| s.scroll_to_top()),
            KeyCode::End => self.scroll_column(self.focus, ColumnScroll::scroll_to_end),
            _ => {}
        }
        Cmd::none()
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Cmd<Msg> {
        if self.load != LoadState::Ready {
            return Cmd::none();
        }
        let (x, y) = mouse.position();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.press_at(x, y),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.pointer_moved(x, y, true);
                Cmd::none()
            }
            MouseEventKind::Moved => {
                self.pointer_moved(x, y, false);
                Cmd::none()
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.press = None;
                let live = self.target_at(x, y);
                match self.drag.end(live) {
                    Some(release) => self.on_release(release),
                    None => Cmd::none(),
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let rows = if mouse.kind == MouseEventKind::ScrollUp { -1 } else { 1 };
                let layout = self.layout();
                let hit = layout.hit(&self.store, |d| self.scroll_offset(d), x, y);
                if let Some(hit) = hit {
                    self.scroll_column(hit.column, |s, n, vp| s.scroll_rows(rows, n, vp));
                }
                Cmd::none()
            }
            _ => Cmd::none(),
        }
    }

    fn press_at(&mut self, x: u16, y: u16) -> Cmd<Msg> {
        let layout = self.layout();
        let Some(hit) = layout.hit(&self.store, |d| self.scroll_offset(d), x, y) else {
            self.press = None;
            return Cmd::none();
        };
        self.focus = hit.column;
        let on_trophy_header = hit.hit == ColumnHit::Header
            && layout.columns.get(hit.column).is_some_and(|slot| slot.is_trophy());
        if on_trophy_header {
            return self.steal();
        }
        self.press = layout
            .draggable(&self.store, &hit)
            .map(|id| PressArm::new(id.clone(), x, y, self.config.drag));
        Cmd::none()
    }

    fn pointer_moved(&mut self, x: u16, y: u16, button_held: bool) {
        if self.drag.is_dragging() {
            let target = self.target_at(x, y);
            self.drag.over(target);
            return;
        }
        if !button_held {
            return;
        }
        if let Some(arm) = self.press.take_if(|arm| arm.exceeded(x, y)) {
            debug!(entity = %arm.entity(), "drag started");
            self.drag.start(arm.entity().clone());
            let target = self.target_at(x, y);
            self.drag.over(target);
        }
    }

    fn on_release(&mut self, release: DropRelease) -> Cmd<Msg> {
        let now = self.clock.now();
        if release.used_fallback {
            debug!(entity = %release.entity, "released over nothing, using last hover");
        }
        match resolve_drop(&self.store, &release.entity, release.target.as_ref()) {
            Resolution::Move(plan) => {
                if let Some(previous) = self.moves.call_at(plan, now) {
                    debug!(entity = %previous.entity, to = %previous.to, "pending move superseded");
                }
            }
            Resolution::NoOp(NoOpReason::SameContainer(_)) => {
                self.toasts.push_at(SAME_CONTAINER_HINT, Severity::Hint, now);
            }
            Resolution::NoOp(NoOpReason::UnknownEntity) => {
                debug!(entity = %release.entity, "dragged entity is gone");
            }
            Resolution::Unresolved => debug!(entity = %release.entity, "drop target unresolved"),
            Resolution::Rejected(_) => {
                self.toasts.push_at(TROPHY_DROP_HINT, Severity::Hint, now);
            }
        }
        Cmd::none()
    }

    fn cancel_drag(&mut self) {
        self.press = None;
        if let Some(entity) = self.drag.cancel() {
            debug!(%entity, "drag cancelled");
        }
    }

    fn target_at(&self, x: u16, y: u16) -> Option<DropTargetId> {
        let layout = self.layout();
        let hit = layout.hit(&self.store, |d| self.scroll_offset(d), x, y)?;
        layout.drop_target(&self.store, &hit)
    }

    fn scroll_column(&mut self, column: usize, f: impl FnOnce(&mut ColumnScroll, usize, u16)) {
        let layout = self.layout();
        let Some(slot) = layout.columns.get(column) else {
            return;
        };
        let count = item_count(&self.store, &slot.dimension);
        f(
            self.scroll.entry(slot.dimension.clone()).or_default(),
            count,
            slot.viewport(),
        );
    }

    /// Re-clamp focus and scroll offsets after the store or size changed.
    fn clamp_view(&mut self) {
        let layout = self.layout();
        self.focus = self.focus.min(layout.columns.len().saturating_sub(1));
        for slot in &layout.columns {
            if let Some(scroll) = self.scroll.get_mut(&slot.dimension) {
                scroll.clamp(item_count(&self.store, &slot.dimension), slot.viewport());
            }
        }
    }

    /// Container the live drop target resolves to, while dragging.
    fn hovered_container(&self) -> Option<DimensionId> {
        let dim = match self.drag.live_hover()? {
            DropTargetId::Container(dim) => dim.clone(),
            DropTargetId::Entity(id) => self.store.container_of(id.as_str())?,
        };
        (!dim.is_trophy()).then_some(dim)
    }

    // ---- view ----

    fn render_board(&self, area: Rect, buf: &mut Buffer) {
        let layout = BoardLayout::compute(area, &self.store);
        self.render_header(layout.header, buf);

        let hovered = self.hovered_container();
        for (index, slot) in layout.columns.iter().enumerate() {
            let focused = index == self.focus;
            let scroll = self.scroll_offset(&slot.dimension);
            if slot.is_trophy() {
                let trophies = self.store.trophies();
                let title = column_title("Rick Prime", trophies.len(), focused);
                DimensionColumn::trophies(&title, trophies, &self.images)
                    .scroll(scroll)
                    .render(slot.area, buf);
            } else {
                let items = self.store.items(slot.dimension.as_str());
                let title = column_title(slot.dimension.as_str(), items.len(), focused);
                let visual = if hovered.as_ref() == Some(&slot.dimension) {
                    ColumnVisual::Hovered
                } else {
                    ColumnVisual::Inert
                };
                DimensionColumn::new(&title, &items, &self.images)
                    .visual(visual)
                    .scroll(scroll)
                    .lifted(self.drag.active())
                    .render(slot.area, buf);
            }
        }

        let help = truncate_with_ellipsis(FOOTER_HELP, layout.footer.width as usize);
        buf.set_string(
            layout.footer.x,
            layout.footer.y,
            &help,
            Style::new().fg(Color::DarkGrey),
            layout.footer.width,
        );

        if self.stealing {
            Banner::new("Rick Prime")
                .line("Stealing a character...")
                .accent(Color::Magenta)
                .render(layout.body, buf);
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let mut status = format!(
            " {TITLE} · {} characters · {} stolen",
            self.store.character_count(),
            self.store.trophies().len()
        );
        if let Some(name) = self
            .drag
            .active()
            .and_then(|id| self.store.character(id.as_str()))
            .map(|c| c.name.as_str())
        {
            status.push_str(&format!(" · carrying {name}"));
        }
        buf.set_string(area.x, area.y, &status, Style::new().bold(), area.width);

        if self.in_flight > 0 {
            let busy = "⟳ working… ";
            let width = display_width(busy) as u16;
            if width < area.width {
                buf.set_string(
                    area.right() - width,
                    area.y,
                    busy,
                    Style::new().fg(Color::Yellow),
                    width,
                );
            }
        }
    }
}

fn column_title(name: &str, count: usize, focused: bool) -> String {
    let marker = if focused { "▸ " } else { "" };
    format!("{marker}{name} ({count})")
}

impl Model for LabModel {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::batch(vec![Cmd::tick(self.config.tick), self.request_load()])
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(event) => self.handle_event(event),
            Msg::Loaded(result) => {
                self.task_finished();
                self.on_loaded(result)
            }
            Msg::Moved { seq, plan, result } => {
                self.task_finished();
                self.on_moved(seq, plan, result)
            }
            Msg::Insulted(result) => {
                self.task_finished();
                self.on_insulted(result)
            }
            Msg::Stolen(result) => {
                self.task_finished();
                self.on_stolen(result)
            }
            Msg::Taunted { taunt, result } => {
                self.task_finished();
                self.on_taunted(taunt, result)
            }
            Msg::ImageLoaded { url, result } => {
                self.task_finished();
                self.on_image(url, result)
            }
        }
    }

    fn view(&self, buf: &mut Buffer) {
        let area = buf.area();
        match &self.load {
            LoadState::Loading => Banner::new(TITLE)
                .line("Opening portals...")
                .accent(Color::Cyan)
                .render(area, buf),
            LoadState::Failed(message) => Banner::new("Could not load characters")
                .line(message)
                .line("press r to retry, q to quit")
                .accent(Color::Red)
                .render(area, buf),
            LoadState::Ready => self.render_board(area, buf),
        }
        ToastStack::new(&self.toasts).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_gateway::InMemoryGateway;
    use portal_runtime::ManualClock;

    fn model_with(characters: Vec<Character>) -> (LabModel, ManualClock) {
        let clock = ManualClock::new();
        let model = LabModel::new(
            Arc::new(InMemoryGateway::new(characters)),
            ImageCache::new(),
            Arc::new(clock.clone()),
            LabConfig::default(),
        );
        (model, clock)
    }

    #[test]
    fn starts_loading_with_pinned_columns() {
        let (model, _) = model_with(Vec::new());
        assert_eq!(model.load_state(), &LoadState::Loading);
        let names: Vec<_> = model
            .store()
            .containers()
            .map(|d| d.as_str().to_string())
            .collect();
        assert_eq!(names, ["C-131", "C-137"]);
    }

    #[test]
    fn init_requests_tick_and_load() {
        let (mut model, _) = model_with(Vec::new());
        let cmd = model.init();
        assert_eq!(cmd.count(), 2);
        assert_eq!(model.in_flight(), 1);
    }

    #[test]
    fn taunt_falls_back_when_insult_fails() {
        let (mut model, _) = model_with(Vec::new());
        model.on_taunted(
            RICK_PRIME_TAUNTS[1],
            Err(GatewayError::Unavailable("no insults".into())),
        );
        model.on_taunted(RICK_PRIME_TAUNTS[0], Ok(Insult::new("You're a Jerry.")));
        assert_eq!(
            model.toasts().messages(Severity::Info),
            [
                RICK_PRIME_TAUNTS[1].to_string(),
                format!("{} — You're a Jerry.", RICK_PRIME_TAUNTS[0]),
            ]
        );
    }

    #[test]
    fn column_titles_mark_focus() {
        assert_eq!(column_title("C-137", 3, false), "C-137 (3)");
        assert_eq!(column_title("C-137", 0, true), "▸ C-137 (0)");
    }
}
