use super::command::Command;
use super::config::CopilotConfig;
use super::sequencer::Sequencer;
use super::status::{NarrationState, SessionEvent, SessionStatus};
use super::timer::TickOutcome;
use crate::recipe::{format_clock, Recipe};
use crate::speech::{
    RecognitionEvent, SpeechCapabilities, SpeechRecognizer, SpeechSynthesizer, UtteranceEvent,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Buffered events per subscriber before the slowest one starts lagging
const EVENT_CAPACITY: usize = 64;

/// Pause before restarting recognition that ended on its own
const LISTEN_RESTART_DELAY: Duration = Duration::from_millis(250);

type SharedSynthesizer = Arc<Mutex<Option<Box<dyn SpeechSynthesizer>>>>;
type SharedRecognizer = Arc<Mutex<Option<Box<dyn SpeechRecognizer>>>>;

/// Mutable session state, only touched under the session lock
///
/// Every deferred task (timer, narration, listener) is tagged with the epoch
/// that was current when it was spawned. Bumping the epoch retires the task:
/// a stale task never mutates state, even if it wakes before its abort lands.
struct SessionState {
    sequencer: Sequencer,
    exited: bool,

    timer_epoch: u64,
    timer_task: Option<JoinHandle<()>>,

    narration: NarrationState,
    narration_enabled: bool,
    narration_supported: bool,
    narration_epoch: u64,
    narration_task: Option<JoinHandle<()>>,

    listening: bool,
    listening_supported: bool,
    listen_epoch: u64,
    listen_task: Option<JoinHandle<()>>,
}

impl SessionState {
    fn new(
        sequencer: Sequencer,
        narration_enabled: bool,
        narration_supported: bool,
        listening_supported: bool,
    ) -> Self {
        Self {
            sequencer,
            exited: false,
            timer_epoch: 0,
            timer_task: None,
            narration: NarrationState::Idle,
            narration_enabled,
            narration_supported,
            narration_epoch: 0,
            narration_task: None,
            listening: false,
            listening_supported,
            listen_epoch: 0,
            listen_task: None,
        }
    }
}

/// A guided cooking walkthrough of one recipe
///
/// Owns the step cursor, the active step's countdown, narration of each
/// step and voice command recognition. All transitions are serialized
/// through one lock, so at most one countdown and one utterance are ever
/// live for the session.
pub struct CopilotSession {
    config: CopilotConfig,
    recipe: Recipe,
    started_at: DateTime<Utc>,
    state: Arc<Mutex<SessionState>>,
    synthesizer: SharedSynthesizer,
    recognizer: SharedRecognizer,
    events: broadcast::Sender<SessionEvent>,
}

fn emit(events: &broadcast::Sender<SessionEvent>, event: SessionEvent) {
    // No subscribers is fine
    let _ = events.send(event);
}

impl CopilotSession {
    /// Enter cooking mode for a recipe
    ///
    /// Speech capabilities are fixed for the lifetime of the session; a
    /// missing capability simply hides the matching feature.
    pub async fn enter(
        recipe: Recipe,
        config: CopilotConfig,
        capabilities: SpeechCapabilities,
    ) -> Arc<Self> {
        let steps = recipe.steps();

        info!(
            "Entering co-pilot session {} for {:?} ({} steps, speech: {:?})",
            config.session_id,
            recipe.name,
            steps.len(),
            capabilities
        );

        if steps.is_empty() {
            warn!("Recipe {:?} has no instruction steps", recipe.name);
        }

        let state = SessionState::new(
            Sequencer::new(steps),
            config.narration_enabled,
            capabilities.can_speak(),
            capabilities.can_listen(),
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let session = Arc::new(Self {
            config,
            recipe,
            started_at: Utc::now(),
            state: Arc::new(Mutex::new(state)),
            synthesizer: Arc::new(Mutex::new(capabilities.synthesizer)),
            recognizer: Arc::new(Mutex::new(capabilities.recognizer)),
            events,
        });

        {
            let mut state = session.state.lock().await;
            if state.narration_enabled {
                session.spawn_narration(&mut state);
            }
        }

        if session.config.auto_listen {
            session.toggle_listening().await;
        }

        session
    }

    pub fn id(&self) -> &str {
        &self.config.session_id
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn is_exited(&self) -> bool {
        self.state.lock().await.exited
    }

    /// Jump to step `index`; out-of-range indexes are ignored
    pub async fn go_to_step(&self, index: usize) -> bool {
        self.navigate(|seq| seq.go_to_step(index)).await
    }

    /// Advance one step; no-op on the last step
    pub async fn next(&self) -> bool {
        self.navigate(Sequencer::next).await
    }

    /// Go back one step; no-op on the first step
    pub async fn previous(&self) -> bool {
        self.navigate(Sequencer::previous).await
    }

    async fn navigate(&self, step: impl FnOnce(&mut Sequencer) -> bool) -> bool {
        let mut state = self.state.lock().await;
        if state.exited || !step(&mut state.sequencer) {
            return false;
        }

        self.stop_timer(&mut state);
        self.cancel_narration(&mut state).await;
        if state.narration_enabled {
            self.spawn_narration(&mut state);
        }

        let index = state.sequencer.current_index();
        let text = state.sequencer.current_step().unwrap_or_default().to_string();
        let remaining_seconds = state.sequencer.timer().remaining();

        info!(
            "Session {}: step {}/{}",
            self.id(),
            index + 1,
            state.sequencer.step_count()
        );

        emit(
            &self.events,
            SessionEvent::StepChanged {
                index,
                step: text,
                remaining_seconds,
            },
        );

        true
    }

    /// Start or pause the active step's countdown
    ///
    /// Returns false when the step has nothing to count down.
    pub async fn toggle_timer(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.exited || !state.sequencer.toggle_timer() {
            return false;
        }

        let remaining_seconds = state.sequencer.timer().remaining().unwrap_or(0);
        if state.sequencer.timer().is_running() {
            self.start_timer(&mut state);
            info!("Session {}: timer started at {}", self.id(), format_clock(remaining_seconds));
            emit(&self.events, SessionEvent::TimerStarted { remaining_seconds });
        } else {
            self.stop_timer(&mut state);
            info!("Session {}: timer paused at {}", self.id(), format_clock(remaining_seconds));
            emit(&self.events, SessionEvent::TimerPaused { remaining_seconds });
        }

        true
    }

    /// Stop the countdown and rewind it to the step's full duration
    pub async fn reset_timer(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.exited {
            return false;
        }

        self.stop_timer(&mut state);
        state.sequencer.reset_timer();

        let remaining_seconds = state.sequencer.timer().remaining();
        emit(&self.events, SessionEvent::TimerReset { remaining_seconds });

        remaining_seconds.is_some()
    }

    /// Pause, resume, or (when idle) read the active step aloud
    pub async fn toggle_narration(&self) -> NarrationState {
        let mut state = self.state.lock().await;
        if state.exited || !state.narration_supported {
            return state.narration;
        }

        match state.narration {
            NarrationState::Idle => {
                self.cancel_narration(&mut state).await;
                self.spawn_narration(&mut state);
            }
            NarrationState::Speaking => {
                let mut synthesizer = self.synthesizer.lock().await;
                if let Some(synthesizer) = synthesizer.as_mut() {
                    match synthesizer.pause().await {
                        Ok(()) => self.set_narration(&mut state, NarrationState::Paused),
                        Err(e) => warn!("Failed to pause narration ({}): {}", synthesizer.name(), e),
                    }
                }
            }
            NarrationState::Paused => {
                let mut synthesizer = self.synthesizer.lock().await;
                if let Some(synthesizer) = synthesizer.as_mut() {
                    match synthesizer.resume().await {
                        Ok(()) => self.set_narration(&mut state, NarrationState::Speaking),
                        Err(e) => warn!("Failed to resume narration ({}): {}", synthesizer.name(), e),
                    }
                }
            }
        }

        state.narration
    }

    /// Turn voice command recognition on or off
    ///
    /// Returns whether the session is listening afterwards.
    pub async fn toggle_listening(self: &Arc<Self>) -> bool {
        let mut state = self.state.lock().await;
        if state.exited || !state.listening_supported {
            return false;
        }

        if state.listening {
            if let Some(task) = self.stop_listening(&mut state).await {
                task.abort();
            }
            return false;
        }

        let Some(recognized) = self.start_recognizer(&mut state).await else {
            return false;
        };

        state.listening = true;
        state.listen_epoch += 1;
        let task = tokio::spawn(listen(Arc::downgrade(self), state.listen_epoch, recognized));
        state.listen_task = Some(task);

        info!("Session {}: listening for voice commands", self.id());
        emit(&self.events, SessionEvent::ListeningChanged { listening: true });

        true
    }

    /// Interpret a spoken or typed phrase and apply the matching command
    ///
    /// Unrecognized phrases are ignored.
    pub async fn handle_command(&self, input: &str) -> Option<Command> {
        let Some(command) = Command::interpret(input) else {
            debug!("Session {}: ignoring unrecognized command {:?}", self.id(), input);
            return None;
        };

        if self.is_exited().await {
            return None;
        }

        info!("Session {}: command {:?} from {:?}", self.id(), command, input);
        emit(&self.events, SessionEvent::CommandRecognized { command });

        match command {
            Command::Next => {
                self.next().await;
            }
            Command::Previous => {
                self.previous().await;
            }
            Command::ToggleTimer => {
                self.toggle_timer().await;
            }
            Command::Exit => {
                self.exit().await;
            }
        }

        Some(command)
    }

    /// Leave cooking mode
    ///
    /// Stops the countdown, narration and listening. Nothing is emitted after
    /// `SessionEvent::Exited`; later calls are no-ops.
    pub async fn exit(&self) -> bool {
        let listen_task = {
            let mut state = self.state.lock().await;
            if state.exited {
                return false;
            }

            state.exited = true;
            self.stop_timer(&mut state);
            self.cancel_narration(&mut state).await;
            let listen_task = self.stop_listening(&mut state).await;

            emit(&self.events, SessionEvent::Exited);
            listen_task
        };

        info!("Exited co-pilot session {}", self.id());

        // Exit may run on the listener task itself (spoken "exit"), so the
        // listener is aborted only after everything else has been torn down.
        if let Some(task) = listen_task {
            task.abort();
        }

        true
    }

    /// Get current session status
    pub async fn status(&self) -> SessionStatus {
        let state = self.state.lock().await;
        let seq = &state.sequencer;
        let remaining_seconds = seq.timer().remaining();

        SessionStatus {
            session_id: self.config.session_id.clone(),
            recipe_name: self.recipe.name.clone(),
            started_at: self.started_at,
            step_index: seq.current_index(),
            step_count: seq.step_count(),
            step_text: seq.current_step().map(str::to_string),
            remaining_seconds,
            remaining_display: remaining_seconds.map(format_clock),
            timer: seq.timer().phase(),
            timer_running: seq.timer().is_running(),
            progress: seq.progress(),
            is_first_step: seq.is_first(),
            is_last_step: seq.is_last(),
            narration: state.narration,
            narration_supported: state.narration_supported,
            listening: state.listening,
            listening_supported: state.listening_supported,
            exited: state.exited,
        }
    }

    fn start_timer(&self, state: &mut SessionState) {
        if let Some(task) = state.timer_task.take() {
            task.abort();
        }

        state.timer_epoch += 1;
        let task = tokio::spawn(run_timer(
            state.timer_epoch,
            self.config.tick_interval,
            Arc::downgrade(&self.state),
            self.events.clone(),
        ));
        state.timer_task = Some(task);
    }

    fn stop_timer(&self, state: &mut SessionState) {
        state.timer_epoch += 1;
        if let Some(task) = state.timer_task.take() {
            task.abort();
        }
        state.sequencer.pause_timer();
    }

    fn set_narration(&self, state: &mut SessionState, narration: NarrationState) {
        if state.narration != narration {
            state.narration = narration;
            emit(&self.events, SessionEvent::NarrationChanged { state: narration });
        }
    }

    /// Retire the pending or in-flight utterance
    async fn cancel_narration(&self, state: &mut SessionState) {
        state.narration_epoch += 1;
        if let Some(task) = state.narration_task.take() {
            task.abort();
        }

        if state.narration_supported {
            let mut synthesizer = self.synthesizer.lock().await;
            if let Some(synthesizer) = synthesizer.as_mut() {
                if let Err(e) = synthesizer.stop().await {
                    warn!(
                        "Failed to stop narration ({}), disabling it: {}",
                        synthesizer.name(),
                        e
                    );
                    state.narration_supported = false;
                }
            }
        }

        self.set_narration(state, NarrationState::Idle);
    }

    /// Schedule narration of the active step after the settling delay
    fn spawn_narration(&self, state: &mut SessionState) {
        if state.exited || !state.narration_supported {
            return;
        }

        let Some(text) = state.sequencer.current_step().map(str::to_string) else {
            return;
        };

        state.narration_epoch += 1;
        let task = tokio::spawn(narrate(
            state.narration_epoch,
            text,
            self.config.narration_delay,
            Arc::downgrade(&self.state),
            Arc::clone(&self.synthesizer),
            self.events.clone(),
        ));
        state.narration_task = Some(task);
    }

    async fn start_recognizer(
        &self,
        state: &mut SessionState,
    ) -> Option<mpsc::Receiver<RecognitionEvent>> {
        let mut recognizer = self.recognizer.lock().await;
        let Some(recognizer) = recognizer.as_mut() else {
            state.listening_supported = false;
            return None;
        };

        match recognizer.start().await {
            Ok(events) => Some(events),
            Err(e) => {
                warn!(
                    "Speech recognition unavailable ({}), disabling voice commands: {}",
                    recognizer.name(),
                    e
                );
                state.listening_supported = false;
                None
            }
        }
    }

    /// Turn listening off, returning the listener task for the caller to abort
    async fn stop_listening(&self, state: &mut SessionState) -> Option<JoinHandle<()>> {
        state.listen_epoch += 1;
        let task = state.listen_task.take();

        if state.listening {
            state.listening = false;

            let mut recognizer = self.recognizer.lock().await;
            if let Some(recognizer) = recognizer.as_mut() {
                if let Err(e) = recognizer.stop().await {
                    warn!("Failed to stop speech recognition ({}): {}", recognizer.name(), e);
                }
            }

            emit(&self.events, SessionEvent::ListeningChanged { listening: false });
        }

        task
    }

    /// Restart recognition that ended on its own, if the user still wants it
    async fn restart_listening(&self, epoch: u64) -> Option<mpsc::Receiver<RecognitionEvent>> {
        let mut state = self.state.lock().await;
        if state.exited || !state.listening || state.listen_epoch != epoch {
            return None;
        }

        debug!("Session {}: restarting speech recognition", self.id());

        let restarted = self.start_recognizer(&mut state).await;
        if restarted.is_none() {
            state.listening = false;
            state.listen_task = None;
            emit(&self.events, SessionEvent::ListeningChanged { listening: false });
        }
        restarted
    }

    async fn listening_failed(&self, epoch: u64) {
        let mut state = self.state.lock().await;
        if state.exited || !state.listening || state.listen_epoch != epoch {
            return;
        }

        state.listening = false;
        state.listen_task = None;
        emit(&self.events, SessionEvent::ListeningChanged { listening: false });
    }
}

impl Drop for CopilotSession {
    fn drop(&mut self) {
        // Sessions discarded without exit() must not leave tasks behind
        if let Ok(mut state) = self.state.try_lock() {
            state.exited = true;
            for task in [
                state.timer_task.take(),
                state.narration_task.take(),
                state.listen_task.take(),
            ]
            .into_iter()
            .flatten()
            {
                task.abort();
            }
        }
    }
}

/// Countdown loop for one run of the active step's timer
///
/// Ends on its own once the session state is gone.
async fn run_timer(
    epoch: u64,
    period: Duration,
    session_state: Weak<Mutex<SessionState>>,
    events: broadcast::Sender<SessionEvent>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);

    loop {
        ticker.tick().await;

        let Some(shared) = session_state.upgrade() else {
            return;
        };
        let mut state = shared.lock().await;
        if state.exited || state.timer_epoch != epoch {
            return;
        }

        match state.sequencer.tick() {
            TickOutcome::Idle => return,
            TickOutcome::Counting(remaining_seconds) => {
                debug!("Timer: {}", format_clock(remaining_seconds));
                emit(&events, SessionEvent::TimerTick { remaining_seconds });
            }
            TickOutcome::Expired => {
                let step_index = state.sequencer.current_index();
                info!("Time's up! The timer for step {} has finished", step_index + 1);
                emit(&events, SessionEvent::TimerTick { remaining_seconds: 0 });
                emit(&events, SessionEvent::TimerExpired { step_index });
                state.timer_task = None;
                return;
            }
        }
    }
}

/// Speak one step and follow its utterance until it ends
async fn narrate(
    epoch: u64,
    text: String,
    delay: Duration,
    session_state: Weak<Mutex<SessionState>>,
    synthesizer: SharedSynthesizer,
    events: broadcast::Sender<SessionEvent>,
) {
    tokio::time::sleep(delay).await;

    let spoken = {
        let mut synthesizer = synthesizer.lock().await;
        match synthesizer.as_mut() {
            Some(synthesizer) => synthesizer.speak(&text).await,
            None => return,
        }
    };

    let mut utterance = match spoken {
        Ok(utterance) => utterance,
        Err(e) => {
            warn!("Narration unavailable, disabling it: {}", e);
            if let Some(shared) = session_state.upgrade() {
                let mut state = shared.lock().await;
                if state.narration_epoch == epoch {
                    state.narration_supported = false;
                }
            }
            return;
        }
    };

    // Apply a narration transition unless this utterance has been superseded
    let apply = |narration: NarrationState| {
        let session_state = session_state.clone();
        let events = events.clone();
        async move {
            let Some(shared) = session_state.upgrade() else {
                return false;
            };
            let mut state = shared.lock().await;
            if state.exited || state.narration_epoch != epoch {
                return false;
            }
            if state.narration != narration {
                state.narration = narration;
                emit(&events, SessionEvent::NarrationChanged { state: narration });
            }
            true
        }
    };

    if !apply(NarrationState::Speaking).await {
        return;
    }

    while let Some(event) = utterance.recv().await {
        let narration = match event {
            UtteranceEvent::Started | UtteranceEvent::Resumed => NarrationState::Speaking,
            UtteranceEvent::Paused => NarrationState::Paused,
            UtteranceEvent::Finished => NarrationState::Idle,
            UtteranceEvent::Failed(reason) => {
                debug!("Narration ended with error: {}", reason);
                NarrationState::Idle
            }
        };

        if !apply(narration).await || narration == NarrationState::Idle {
            return;
        }
    }

    apply(NarrationState::Idle).await;
}

/// Feed recognized phrases into the session while listening is on
async fn listen(
    session: Weak<CopilotSession>,
    epoch: u64,
    mut recognized: mpsc::Receiver<RecognitionEvent>,
) {
    loop {
        let event = recognized.recv().await.unwrap_or(RecognitionEvent::Ended);

        match event {
            RecognitionEvent::Utterance(phrase) => {
                let Some(session) = session.upgrade() else {
                    return;
                };
                debug!("Voice command heard: {}", phrase);
                session.handle_command(&phrase).await;
            }
            RecognitionEvent::Ended => {
                tokio::time::sleep(LISTEN_RESTART_DELAY).await;

                let Some(session) = session.upgrade() else {
                    return;
                };
                match session.restart_listening(epoch).await {
                    Some(restarted) => recognized = restarted,
                    None => return,
                }
            }
            RecognitionEvent::Failed(reason) => {
                warn!("Speech recognition error: {}", reason);
                if let Some(session) = session.upgrade() {
                    session.listening_failed(epoch).await;
                }
                return;
            }
        }
    }
}
