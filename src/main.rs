use clap::Parser;
use iced::keyboard::{self, key, Key};
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::widget::{center, column, image, row, text};
use iced::{event, window, Element, Event, Length, Size, Subscription, Task, Theme};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;

mod config;
mod error;
mod source;
mod state;
mod ui;

use config::{Cli, GalleryConfig};
use source::thumbnail::{self, Thumbnail};
use source::{Location, Source};
use state::app::{AppState, Effect, Intent, LoadPhase};

/// Thumbnail downloads allowed to run at once
const MAX_THUMBNAIL_DOWNLOADS: usize = 6;
/// Thumbnails are requested this far above and below the viewport
const PREFETCH_MARGIN: f32 = 600.0;
/// Decoded thumbnails farther than this from the viewport are dropped
const KEEP_MARGIN: f32 = 4000.0;

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Anything the state engine understands
    Intent(Intent),
    ThumbnailLoaded(u32, Option<Thumbnail>),
    ImageLoaded(u32, Option<Vec<u8>>),
    SearchChanged(String),
    SearchSubmitted,
    Scrolled(scrollable::Viewport),
    WindowResized(Size),
    /// The page requested by the last `SettlePage` is on screen
    PageShown,
    Escape,
}

/// Main application state
struct Gallery {
    state: AppState,
    /// `None` when the configuration was unusable
    source: Option<Source>,
    thumbnail_size: u32,
    thumbnails: HashMap<u32, image::Handle>,
    /// Thumbnails loaded or in flight
    requested: HashSet<u32>,
    downloads: Arc<Semaphore>,
    full_images: HashMap<u32, image::Handle>,
    search: String,
    scroll_y: f32,
    viewport_height: f32,
}

impl Gallery {
    fn new(config: GalleryConfig, source: Option<Source>, boot: Vec<Message>) -> (Self, Task<Message>) {
        let today = chrono::Local::now().date_naive();
        let utc_today = chrono::Utc::now().date_naive();

        let mut gallery = Gallery {
            state: AppState::new(config.settings(), today, utc_today),
            source,
            thumbnail_size: config.thumbnail_size,
            thumbnails: HashMap::new(),
            requested: HashSet::new(),
            downloads: Arc::new(Semaphore::new(MAX_THUMBNAIL_DOWNLOADS)),
            full_images: HashMap::new(),
            search: String::new(),
            scroll_y: 0.0,
            viewport_height: 0.0,
        };

        // CLI query and config errors first, then the manifest fetch
        let mut tasks: Vec<Task<Message>> = boot.into_iter().map(|m| gallery.update(m)).collect();
        if let Some(source) = gallery.source.clone() {
            tasks.push(Task::perform(source::load_library(source), |result| match result {
                Ok(library) => Message::Intent(Intent::ManifestLoaded(library)),
                Err(e) => Message::Intent(Intent::ManifestFailed(e.to_string())),
            }));
        }

        (gallery, Task::batch(tasks))
    }

    fn dispatch(&mut self, intent: Intent) -> Task<Message> {
        // the app may run past midnight
        self.state
            .set_clock(chrono::Local::now().date_naive(), chrono::Utc::now().date_naive());

        let effects = self.state.update(intent);
        Task::batch(effects.into_iter().map(|effect| self.run(effect)))
    }

    /// Turn a requested effect into an iced task
    fn run(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::FetchDetail(month) => match self.source.clone() {
                Some(source) => Task::perform(source::fetch_month_detail(source, month), move |entries| {
                    Message::Intent(Intent::DetailLoaded(month, entries))
                }),
                None => Task::none(),
            },
            Effect::FetchThumbnails(wanted) => self.request_thumbnails(wanted),
            Effect::FetchImage(number, url) => {
                // reopening the same record reuses the decoded image
                if self.full_images.contains_key(&number) {
                    return Task::none();
                }
                match self.source.clone() {
                    Some(source) => Task::perform(thumbnail::load_full_image(source, url), move |result| {
                        match result {
                            Ok(bytes) => Message::ImageLoaded(number, Some(bytes)),
                            Err(e) => {
                                log::warn!("⚠️  Image for #{} failed: {}", number, e);
                                Message::ImageLoaded(number, None)
                            }
                        }
                    }),
                    None => Task::none(),
                }
            }
            Effect::CopyToClipboard(contents) => iced::clipboard::write(contents),
            Effect::ScheduleCopyReset { token, after } => Task::perform(tokio::time::sleep(after), move |_| {
                Message::Intent(Intent::CopyResetElapsed(token))
            }),
            Effect::OpenExternal(target) => {
                log::info!("🌐 Opening {}", target);
                if let Err(e) = opener::open(&target) {
                    log::warn!("⚠️  Could not open {}: {}", target, e);
                }
                Task::none()
            }
            Effect::ScrollToMonth(month) => {
                let rows = ui::grid::layout(self.state.feed().items(), self.columns());
                let Some(y) = ui::grid::month_offset(&rows, month) else {
                    return Task::none();
                };

                // the landing rows need their thumbnails before any scroll event arrives
                self.scroll_y = y;
                let thumbnails = self.sync_thumbnails();
                Task::batch([
                    scrollable::scroll_to(ui::grid::grid_id(), AbsoluteOffset { x: 0.0, y }),
                    thumbnails,
                ])
            }
            // let the view take the page before the guard is released
            Effect::SettlePage => Task::done(Message::PageShown),
        }
    }

    /// Start downloads for thumbnails not yet loaded or in flight
    fn request_thumbnails(&mut self, wanted: Vec<(u32, String)>) -> Task<Message> {
        let Some(source) = self.source.clone() else {
            return Task::none();
        };
        let size = self.thumbnail_size;
        let fresh: Vec<(u32, String)> = wanted
            .into_iter()
            .filter(|(number, _)| self.requested.insert(*number))
            .collect();

        Task::batch(fresh.into_iter().map(|(number, url)| {
            let source = source.clone();
            let downloads = self.downloads.clone();
            Task::perform(
                async move {
                    // Wait for a download slot; the semaphore is never closed
                    let _permit = downloads.acquire_owned().await.ok();
                    thumbnail::load_thumbnail(source, number, url, size).await
                },
                move |result| match result {
                    Ok(thumb) => Message::ThumbnailLoaded(number, Some(thumb)),
                    Err(e) => {
                        log::warn!("⚠️  Thumbnail for #{} failed: {}", number, e);
                        Message::ThumbnailLoaded(number, None)
                    }
                },
            )
        }))
    }

    /// Fetch thumbnails around the viewport and drop the ones far outside it
    fn sync_thumbnails(&mut self) -> Task<Message> {
        let rows = ui::grid::layout(self.state.feed().items(), self.columns());
        let bottom = self.scroll_y + self.viewport_height;

        // Evict decoded handles far out of view so they can be fetched again later
        let keep: HashSet<u32> = ui::grid::records_between(&rows, self.scroll_y - KEEP_MARGIN, bottom + KEEP_MARGIN)
            .into_iter()
            .filter_map(|i| self.state.library().record(i))
            .map(|r| r.number)
            .collect();
        let before = self.thumbnails.len();
        let requested = &mut self.requested;
        self.thumbnails.retain(|number, _| {
            let kept = keep.contains(number);
            if !kept {
                requested.remove(number);
            }
            kept
        });
        if self.thumbnails.len() < before {
            log::debug!("🧹 Dropped {} off-screen thumbnails", before - self.thumbnails.len());
        }

        // Request what is near the viewport
        let wanted: Vec<(u32, String)> =
            ui::grid::records_between(&rows, self.scroll_y - PREFETCH_MARGIN, bottom + PREFETCH_MARGIN)
                .into_iter()
                .filter_map(|i| self.state.library().record(i))
                .map(|r| (r.number, r.url.clone()))
                .collect();
        self.request_thumbnails(wanted)
    }

    fn columns(&self) -> usize {
        ui::grid::columns_for(self.state.is_narrow())
    }

    /// Whether the sentinel below the last row is within reach
    fn sentinel_visible(&self) -> bool {
        let rows = ui::grid::layout(self.state.feed().items(), self.columns());
        let content = ui::grid::content_height(&rows);
        ui::grid::near_bottom(content, self.viewport_height, self.scroll_y)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Intent(intent) => self.dispatch(intent),
            Message::ThumbnailLoaded(number, thumb) => {
                match thumb {
                    Some(thumb) => {
                        self.thumbnails
                            .insert(number, image::Handle::from_rgba(thumb.width, thumb.height, thumb.pixels));
                    }
                    // allow a retry when the record is shown again
                    None => {
                        self.requested.remove(&number);
                    }
                }
                Task::none()
            }
            Message::ImageLoaded(number, bytes) => {
                if let Some(bytes) = bytes {
                    // only the open record's image is worth keeping
                    let open = self.state.overlay().number();
                    self.full_images.retain(|n, _| Some(*n) == open);
                    self.full_images.insert(number, image::Handle::from_bytes(bytes));
                }
                Task::none()
            }
            Message::SearchChanged(value) => {
                self.search = value;
                Task::none()
            }
            Message::SearchSubmitted => {
                let query = self.search.trim().to_string();
                if query.is_empty() {
                    return Task::none();
                }
                self.dispatch(Intent::Search(query))
            }
            Message::Scrolled(viewport) => {
                self.scroll_y = viewport.absolute_offset().y;
                self.viewport_height = viewport.bounds().height;
                let content = viewport.content_bounds().height;
                let thumbnails = self.sync_thumbnails();

                // Bottom sentinel in reach: ask for the next page
                if ui::grid::near_bottom(content, self.viewport_height, self.scroll_y) {
                    Task::batch([thumbnails, self.dispatch(Intent::LoadMore)])
                } else {
                    thumbnails
                }
            }
            Message::WindowResized(size) => {
                if self.viewport_height == 0.0 {
                    self.viewport_height = size.height;
                }
                self.dispatch(Intent::ViewportResized(size.width))
            }
            Message::PageShown => {
                let settled = self.dispatch(Intent::PageSettled);
                // a short page may leave the sentinel on screen without any scrolling
                if self.sentinel_visible() {
                    Task::batch([settled, self.dispatch(Intent::LoadMore)])
                } else {
                    settled
                }
            }
            Message::Escape => {
                if self.state.overlay().is_open() {
                    self.dispatch(Intent::CloseOverlay)
                } else if self.state.calendar().is_open() {
                    self.dispatch(Intent::CloseCalendar)
                } else {
                    Task::none()
                }
            }
        }
    }

    fn view(&self) -> Element<Message> {
        match self.state.phase() {
            LoadPhase::Loading => return center(text("Loading cats…").size(24)).into(),
            LoadPhase::Failed(error) => {
                return center(
                    column![
                        text("😿 Could not load the cat list").size(24),
                        text(error.as_str()).size(14),
                    ]
                    .spacing(10),
                )
                .into()
            }
            LoadPhase::Ready => {}
        }

        let mut body = column![ui::header(&self.state, &self.search)];
        if let Some(status) = self.state.status() {
            body = body.push(text(status).size(14));
        }

        let grid = ui::grid::view(&self.state, &self.thumbnails, self.columns());
        let main: Element<Message> = if self.state.timeline().is_panel_open() {
            row![ui::timeline::view(self.state.timeline()), grid]
                .height(Length::Fill)
                .into()
        } else {
            grid
        };
        let mut screen: Element<Message> = body.push(main).into();

        if self.state.calendar().is_open() {
            screen = ui::modal(
                screen,
                ui::calendar::view(self.state.calendar_grid()),
                ui::intent(Intent::CloseCalendar),
                0.2,
            );
        }

        if self.state.overlay().is_open() {
            let picture = self
                .state
                .overlay()
                .number()
                .and_then(|number| self.full_images.get(&number));
            screen = ui::modal(
                screen,
                ui::overlay::view(&self.state, picture),
                ui::intent(Intent::CloseOverlay),
                0.8,
            );
        }

        screen
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            event::listen_with(escape_pressed),
            window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
        ])
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Escape must work even while the search box has focus, so the event status is ignored
fn escape_pressed(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: Key::Named(key::Named::Escape),
            ..
        }) => Some(Message::Escape),
        _ => None,
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = GalleryConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        log::warn!("⚠️  Ignoring config file: {}", e);
        GalleryConfig::default()
    });

    let mut boot = Vec::new();
    let source = match config.apply_cli(&cli) {
        Ok(()) => {
            let location = match &config.local_path {
                Some(path) => Location::Local(path.clone()),
                None => Location::Remote(config.base_url.clone()),
            };
            match Source::new(location, config.timeout()) {
                Ok(source) => Some(source),
                Err(e) => {
                    boot.push(Message::Intent(Intent::ManifestFailed(e.to_string())));
                    None
                }
            }
        }
        Err(e) => {
            boot.push(Message::Intent(Intent::ManifestFailed(e.to_string())));
            None
        }
    };

    if let Some(query) = cli.query.clone() {
        boot.push(Message::SearchChanged(query.clone()));
        boot.push(Message::Intent(Intent::Search(query)));
    }

    log::info!("🎨 Cat Gallery starting");

    iced::application("Cat Gallery", Gallery::update, Gallery::view)
        .theme(Gallery::theme)
        .subscription(Gallery::subscription)
        .window_size(Size::new(1280.0, 860.0))
        .centered()
        .run_with(move || Gallery::new(config, source, boot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::keyboard::key::{Code, Physical};
    use iced::keyboard::{Location, Modifiers};

    fn key_press(key: Key, code: Code) -> Event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: key.clone(),
            modified_key: key,
            physical_key: Physical::Code(code),
            location: Location::Standard,
            modifiers: Modifiers::default(),
            text: None,
        })
    }

    #[test]
    fn test_escape_is_seen_even_when_a_widget_captured_it() {
        let escape = key_press(Key::Named(key::Named::Escape), Code::Escape);
        let window = window::Id::unique();

        assert!(matches!(
            escape_pressed(escape.clone(), event::Status::Captured, window),
            Some(Message::Escape)
        ));
        assert!(matches!(
            escape_pressed(escape, event::Status::Ignored, window),
            Some(Message::Escape)
        ));

        let enter = key_press(Key::Named(key::Named::Enter), Code::Enter);
        assert!(escape_pressed(enter, event::Status::Captured, window).is_none());
    }
}
