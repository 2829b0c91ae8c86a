//! The `watch` screen.
//!
//! Three tasks repaint it: the poller after each reload, the search
//! debouncer when a term settles and the toast sweep when a toast expires or
//! the loading state flips. Every frame is rendered to a string first and
//! then cleared-and-written while holding the [`Screen`] lock, so frames from
//! different tasks never interleave.

use super::render::render_watch_frame;
use console::Term;
use pessoas::client::PeopleClient;
use pessoas::debounce::search_debouncer;
use pessoas::error::Result;
use pessoas::notify::{spawn_expiry, EXPIRY_TICK};
use pessoas::poller::spawn_poller_with;
use pessoas::transport::Transport;
use pessoas::view::PeopleView;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Where finished frames go.
pub(super) trait Canvas: Send {
    fn draw(&mut self, frame: &str);
}

impl Canvas for Term {
    fn draw(&mut self, frame: &str) {
        let _ = self.clear_screen();
        let _ = self.write_str(frame);
        let _ = self.flush();
    }
}

pub(super) struct Screen<T: Transport, C: Canvas> {
    client: Arc<PeopleClient<T>>,
    canvas: Arc<Mutex<C>>,
    interval_secs: u64,
    use_color: Option<bool>,
}

impl<T: Transport, C: Canvas> Clone for Screen<T, C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            canvas: Arc::clone(&self.canvas),
            interval_secs: self.interval_secs,
            use_color: self.use_color,
        }
    }
}

impl<T: Transport, C: Canvas> Screen<T, C> {
    pub(super) fn new(
        client: Arc<PeopleClient<T>>,
        canvas: C,
        interval_secs: u64,
        use_color: Option<bool>,
    ) -> Self {
        Self {
            client,
            canvas: Arc::new(Mutex::new(canvas)),
            interval_secs,
            use_color,
        }
    }

    pub(super) fn repaint(&self) {
        self.paint(&self.client.view());
    }

    pub(super) fn paint(&self, view: &PeopleView) {
        let mut canvas = self.canvas.lock().unwrap_or_else(|e| e.into_inner());
        let notifications = self.client.notifications();
        notifications.expire();
        let frame = render_watch_frame(
            view,
            &notifications.active(),
            self.interval_secs,
            self.client.loading().is_loading(),
            self.use_color,
        );
        canvas.draw(&frame);
    }
}

/// Runs until Ctrl+C. Each stdin line becomes the new search term.
pub(super) async fn run<T: Transport + 'static>(
    client: Arc<PeopleClient<T>>,
    every: Duration,
    debounce: Duration,
    use_color: Option<bool>,
) -> Result<()> {
    let screen = Screen::new(Arc::clone(&client), Term::stdout(), every.as_secs(), use_color);

    // A failed first load is already a toast; keep watching.
    let _ = client.reload().await;
    screen.repaint();

    let poll_screen = screen.clone();
    let poller = spawn_poller_with(Arc::clone(&client), every, move |_| poll_screen.repaint());

    let search_screen = screen.clone();
    let search = search_debouncer(Arc::clone(&client), debounce, move |view| {
        search_screen.paint(&view)
    });

    let sweep_screen = screen.clone();
    let mut was_loading = false;
    let sweep = spawn_expiry(client.notifications().clone(), EXPIRY_TICK, move |expired| {
        let loading = sweep_screen.client.loading().is_loading();
        if expired > 0 || loading != was_loading {
            was_loading = loading;
            sweep_screen.repaint();
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(term)) => {
                    search.push(term);
                }
                Ok(None) | Err(_) => stdin_open = false,
            },
        }
    }

    search.finish().await;
    poller.shutdown().await;
    sweep.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pessoas::model::Person;
    use pessoas::notify::Notifications;
    use pessoas::transport::memory::MemoryTransport;

    /// Keeps every frame it is handed.
    #[derive(Default)]
    struct Frames(Vec<String>);

    impl Canvas for Frames {
        fn draw(&mut self, frame: &str) {
            self.0.push(frame.to_string());
        }
    }

    fn screen_with(people: Vec<Person>) -> Screen<MemoryTransport, Frames> {
        let client = Arc::new(PeopleClient::new(
            MemoryTransport::with_people(people),
            "pessoas",
            Notifications::default(),
        ));
        Screen::new(client, Frames::default(), 30, Some(false))
    }

    fn frames(screen: &Screen<MemoryTransport, Frames>) -> Vec<String> {
        screen.canvas.lock().unwrap().0.clone()
    }

    #[tokio::test]
    async fn frames_from_many_threads_stay_whole() {
        let screen = screen_with(vec![Person::new(1, "Ana", 30)]);
        screen.client.reload().await.unwrap();

        let painters: Vec<_> = (0..8)
            .map(|_| {
                let screen = screen.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        screen.repaint();
                    }
                })
            })
            .collect();
        for painter in painters {
            painter.join().unwrap();
        }

        let frames = frames(&screen);
        assert_eq!(frames.len(), 80);
        assert!(frames.iter().all(|f| f == &frames[0]));
        assert!(frames[0].starts_with("Pessoas (atualiza a cada 30s"));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_toast_is_gone_from_the_next_frame() {
        let screen = screen_with(vec![]);
        screen.client.notifications().error("Erro de conexão");
        screen.repaint();

        tokio::time::advance(Duration::from_secs(5)).await;
        screen.repaint();

        let frames = frames(&screen);
        assert!(frames[0].contains("Erro de conexão"));
        assert!(!frames[1].contains("Erro de conexão"));
    }

    #[tokio::test]
    async fn header_shows_requests_in_flight() {
        let screen = screen_with(vec![]);
        let busy = screen.client.loading().begin();
        screen.repaint();
        drop(busy);
        screen.repaint();

        let frames = frames(&screen);
        assert!(frames[0].contains("atualizando…"));
        assert!(!frames[1].contains("atualizando…"));
    }
}
