//! MPRIS presence: publishes now-playing metadata on the D-Bus session bus
//! and forwards remote transport commands back to the runtime.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use super::{Activity, PresenceEvent, PresenceNotifier};
use crate::catalog::Track;
use crate::error::PresenceError;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Transport commands received from MPRIS clients (media keys, `playerctl`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Status {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Default)]
struct SharedState {
    status: Status,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

impl SharedState {
    fn apply(&mut self, event: &PresenceEvent) {
        self.status = match (&event.activity, &event.track) {
            (Activity::NowPlaying { .. }, _) => Status::Playing,
            (Activity::Idle, Some(_)) => Status::Paused,
            (Activity::Idle, None) => Status::Stopped,
        };

        let Some(track) = event.track.as_deref() else {
            *self = SharedState {
                status: self.status,
                ..SharedState::default()
            };
            return;
        };

        self.title = Some(track.title.clone());
        self.artist = vec![track.artist_or_unknown().to_string()];
        self.album = track.album.clone();
        self.url = Some(format!("file://{}", track.path.display()));
        self.length_micros = track
            .duration
            .map(|d| i64::try_from(d.as_micros()).unwrap_or(i64::MAX));
        self.track_id = track_object_path(track);
    }
}

/// MPRIS track ids must be valid object paths; hash the catalog id into one.
fn track_object_path(track: &Track) -> Option<OwnedObjectPath> {
    let mut hasher = DefaultHasher::new();
    track.id.hash(&mut hasher);
    let path = format!("/org/encore/track/t{:016x}", hasher.finish());
    ObjectPath::try_from(path).ok().map(OwnedObjectPath::from)
}

/// Presence channel backed by an MPRIS service thread.
pub struct MprisPresence {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl PresenceNotifier for MprisPresence {
    fn notify(&self, event: &PresenceEvent) -> Result<(), PresenceError> {
        self.state
            .lock()
            .map_err(|_| PresenceError::Bus("presence state poisoned".to_string()))?
            .apply(event);
        // The service thread drops its receiver when the bus is gone.
        self.notify.send(()).map_err(|_| PresenceError::Unavailable)
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
    identity: String,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No window to raise in a terminal.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> String {
        self.identity.clone()
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.status {
            Status::Stopped => "Stopped",
            Status::Playing => "Playing",
            Status::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Option<OwnedValue>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };

        put(
            "mpris:trackid",
            s.track_id
                .clone()
                .and_then(|p| owned(Value::from(p.into_inner()))),
        );
        put("xesam:title", s.title.clone().and_then(|t| owned(Value::from(t))));
        if !s.artist.is_empty() {
            put("xesam:artist", owned(Value::from(s.artist.clone())));
        }
        put("xesam:album", s.album.clone().and_then(|a| owned(Value::from(a))));
        put("xesam:url", s.url.clone().and_then(|u| owned(Value::from(u))));
        put("mpris:length", s.length_micros.and_then(|l| owned(Value::from(l))));
        map
    }
}

/// Start the MPRIS service thread.
///
/// `tx` receives remote transport commands. The returned notifier reports
/// [`PresenceError::Unavailable`] once the service has given up (for example
/// when there is no session bus).
pub fn spawn_mpris(identity: &str, tx: Sender<ControlCmd>) -> MprisPresence {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let identity = identity.to_string();
    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            if let Err(e) = serve(&identity, tx, state_for_thread, notify_rx).await {
                warn!(error = %e, "MPRIS presence unavailable");
            }
        });
    });

    MprisPresence {
        state,
        notify: notify_tx,
    }
}

async fn serve(
    identity: &str,
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify_rx: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection
        .request_name(format!("org.mpris.MediaPlayer2.{identity}"))
        .await?;

    let object_server = connection.object_server();
    object_server
        .at(
            OBJECT_PATH,
            RootIface {
                tx: tx.clone(),
                identity: identity.to_string(),
            },
        )
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;
    info!(identity, "MPRIS presence registered");

    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;

    loop {
        Timer::after(Duration::from_millis(100)).await;

        let mut changed = false;
        loop {
            match notify_rx.try_recv() {
                Ok(()) => changed = true,
                Err(mpsc::TryRecvError::Empty) => break,
                // The player is gone; stop serving.
                Err(mpsc::TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if !changed {
            continue;
        }

        let emitter = player.signal_emitter();
        let iface = player.get().await;
        iface.playback_status_changed(emitter).await?;
        iface.metadata_changed(emitter).await?;
    }
}
