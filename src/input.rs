use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::TryRecvError;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use tracing::debug;
use tracing::warn;

/// Longest the reader thread blocks on the terminal before it checks for shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A queue of key presses the game loop drains.
pub trait KeySource {
    /// Take the next pending key press.
    ///
    /// Returns immediately, with `None` if nothing is pending.
    fn try_next(&mut self) -> Option<KeyEvent>;
}

/// A pre-recorded sequence of keys, handed out one per call
impl KeySource for VecDeque<KeyEvent> {
    fn try_next(&mut self) -> Option<KeyEvent> {
        self.pop_front()
    }
}

/// Reads key presses on a background thread and hands them over through a channel.
pub struct InputThread {
    rx: Receiver<KeyEvent>,

    /// Tells the reader thread to stop at its next poll
    stop: Arc<AtomicBool>,

    handle: Option<JoinHandle<io::Result<()>>>,

    /// Set once the reader thread is gone
    closed: bool,
}

impl InputThread {
    /// Start reading from the terminal
    pub fn spawn() -> io::Result<Self> {
        Self::spawn_with(read_terminal)
    }

    /// Start reading from `read`, which waits at most the given timeout for an event.
    ///
    /// Only key presses are forwarded. Releases, repeats and non-key events are dropped.
    pub fn spawn_with<F>(mut read: F) -> io::Result<Self>
    where
        F: FnMut(Duration) -> io::Result<Option<Event>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("input".to_string())
            .spawn(move || {
                while !flag.load(Ordering::Relaxed) {
                    let Some(event) = read(POLL_INTERVAL)? else {
                        continue;
                    };

                    match event {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            // receiver gone, nobody is listening anymore
                            if tx.send(key).is_err() {
                                break;
                            }
                        }
                        _ => {}
                    }
                }

                Ok(())
            })?;

        Ok(Self {
            rx,
            stop,
            handle: Some(handle),
            closed: false,
        })
    }

    /// Stop the reader thread and wait for it to exit.
    ///
    /// Returns the error the reader failed with, if any.
    pub fn shutdown(mut self) -> io::Result<()> {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> io::Result<()> {
        self.stop.store(true, Ordering::Relaxed);

        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        match handle.join() {
            Ok(res) => res,
            Err(_) => Err(io::Error::other("input thread panicked")),
        }
    }
}

impl KeySource for InputThread {
    /// Once the reader thread is gone, every call reports Ctrl-D (end of transmission).
    fn try_next(&mut self) -> Option<KeyEvent> {
        match self.rx.try_recv() {
            Ok(key) => Some(key),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.closed {
                    warn!("input closed, treating it as end of transmission");
                    self.closed = true;
                }

                Some(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL))
            }
        }
    }
}

impl Drop for InputThread {
    fn drop(&mut self) {
        if let Err(e) = self.stop_and_join() {
            debug!("input thread exited with: {e}");
        }
    }
}

fn read_terminal(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;
    use std::io;
    use std::thread;
    use std::time::Duration;
    use std::time::Instant;

    use crossterm::event::Event;
    use crossterm::event::KeyCode;
    use crossterm::event::KeyEvent;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyEventState;
    use crossterm::event::KeyModifiers;

    use super::InputThread;
    use super::KeySource;

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// A reader that replays `events`, then idles
    fn scripted(events: Vec<Event>) -> impl FnMut(Duration) -> io::Result<Option<Event>> {
        let mut events = VecDeque::from(events);

        move |timeout| match events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => {
                thread::sleep(timeout.min(Duration::from_millis(1)));
                Ok(None)
            }
        }
    }

    /// Poll `keys` until `n` events were seen or a generous deadline passes
    fn collect(keys: &mut impl KeySource, n: usize) -> Vec<KeyEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut out = Vec::new();

        while out.len() < n && Instant::now() < deadline {
            match keys.try_next() {
                Some(key) => out.push(key),
                None => thread::sleep(Duration::from_millis(1)),
            }
        }

        out
    }

    #[test]
    fn vec_deque_replays_in_order() {
        let mut keys = VecDeque::from([press('p'), press('s')]);

        assert_eq!(keys.try_next(), Some(press('p')));
        assert_eq!(keys.try_next(), Some(press('s')));
        assert_eq!(keys.try_next(), None);
    }

    #[test]
    fn forwards_key_presses_only() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );

        let events = vec![
            Event::Key(press('p')),
            Event::Key(release),
            Event::Resize(10, 10),
            Event::Key(press('q')),
        ];

        let mut keys = InputThread::spawn_with(scripted(events)).unwrap();
        let got = collect(&mut keys, 2);

        assert_eq!(got, vec![press('p'), press('q')]);
        assert_eq!(keys.try_next(), None);

        keys.shutdown().unwrap();
    }

    #[test]
    fn try_next_does_not_block() {
        let mut keys = InputThread::spawn_with(scripted(Vec::new())).unwrap();

        let t = Instant::now();
        assert_eq!(keys.try_next(), None);
        assert!(t.elapsed() < Duration::from_millis(50));

        keys.shutdown().unwrap();
    }

    #[test]
    fn reader_error_closes_input() {
        let mut keys = InputThread::spawn_with(|_| Err(io::Error::other("broken pipe"))).unwrap();
        let got = collect(&mut keys, 1);

        assert_eq!(
            got,
            vec![KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)]
        );

        let err = keys.shutdown().unwrap_err();
        assert_eq!(err.to_string(), "broken pipe");
    }
}
