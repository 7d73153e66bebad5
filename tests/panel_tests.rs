//! End-to-end panel tests against a mock advisory backend
//!
//! These drive the full turn cycle (submit, await the dispatch, apply the
//! reply) with scripted speech ports standing in for the host engines, and
//! verify the ordering and staleness rules of the conversation panel.

use cropiq::conversation::Role;
use cropiq::language::Language;
use cropiq::panel::{AssistantPanel, PanelConfig, SpeechState, FALLBACK_REPLY};
use cropiq::speech::ports::{RecognitionPort, SessionId, SynthesisPort, UtteranceId};
use cropiq::speech::{NullRecognition, NullSynthesis};
use cropiq::AssistantError;
use mockito::{Matcher, Server, ServerGuard};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MicState {
    started: Vec<(SessionId, String)>,
    aborted: Vec<SessionId>,
}

/// Recognition double recording every call
#[derive(Clone, Default)]
struct FakeMic {
    state: Arc<Mutex<MicState>>,
}

impl RecognitionPort for FakeMic {
    fn available(&self) -> bool {
        true
    }

    fn start(&mut self, session: SessionId, locale: &str) -> cropiq::Result<()> {
        self.state.lock().started.push((session, locale.to_string()));
        Ok(())
    }

    fn abort(&mut self, session: SessionId) {
        self.state.lock().aborted.push(session);
    }
}

#[derive(Debug, Default)]
struct VoiceState {
    active: Option<UtteranceId>,
    paused: bool,
    spoken: Vec<String>,
}

/// Synthesis double modeling a single-voice engine
#[derive(Clone, Default)]
struct FakeVoice {
    state: Arc<Mutex<VoiceState>>,
}

impl SynthesisPort for FakeVoice {
    fn available(&self) -> bool {
        true
    }

    fn speak(&mut self, utterance: UtteranceId, text: &str, _locale: &str) -> cropiq::Result<()> {
        let mut state = self.state.lock();
        assert!(state.active.is_none(), "two overlapping utterances");
        state.active = Some(utterance);
        state.paused = false;
        state.spoken.push(text.to_string());
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().paused = true;
    }

    fn resume(&mut self) {
        self.state.lock().paused = false;
    }

    fn cancel_all(&mut self) {
        let mut state = self.state.lock();
        state.active = None;
        state.paused = false;
    }

    fn is_speaking(&self) -> bool {
        self.state.lock().active.is_some()
    }

    fn is_paused(&self) -> bool {
        self.state.lock().paused
    }
}

fn panel_for(server: &ServerGuard) -> (AssistantPanel, FakeMic, FakeVoice) {
    let mic = FakeMic::default();
    let voice = FakeVoice::default();
    let config = PanelConfig::default().with_endpoint(format!("{}/ask", server.url()));
    let panel =
        AssistantPanel::new(config, Box::new(mic.clone()), Box::new(voice.clone())).unwrap();
    (panel, mic, voice)
}

async fn mock_reply(server: &mut ServerGuard, message: &str, reply: &str) -> mockito::Mock {
    server
        .mock("POST", "/ask")
        .match_body(Matcher::PartialJson(serde_json::json!({ "message": message })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"reply":"{}"}}"#, reply))
        .create_async()
        .await
}

fn texts(panel: &AssistantPanel) -> Vec<String> {
    panel
        .store()
        .snapshot()
        .iter()
        .map(|m| m.text.clone())
        .collect()
}

#[tokio::test]
async fn test_single_turn_orders_greeting_user_reply() {
    let mut server = Server::new_async().await;
    let mock = mock_reply(&mut server, "What crop for sandy soil?", "Try millet").await;
    let (mut panel, _, voice) = panel_for(&server);

    let pending = panel.submit("What crop for sandy soil?").unwrap();
    let seq = pending.seq();
    // The user's own message is visible before the reply arrives
    assert_eq!(
        texts(&panel),
        vec!["Hi! How can I help you today?", "What crop for sandy soil?"]
    );
    assert_eq!(panel.speech_state(), SpeechState::AwaitingReply);

    let outcome = panel.apply_reply(seq, pending.await);
    mock.assert_async().await;
    assert_eq!(outcome.appended, 1);
    assert!(outcome.spoke);
    assert_eq!(
        texts(&panel),
        vec![
            "Hi! How can I help you today?",
            "What crop for sandy soil?",
            "Try millet"
        ]
    );
    // The raw reply is what gets spoken
    assert_eq!(voice.state.lock().spoken, vec!["Try millet"]);
    assert_eq!(panel.speech_state(), SpeechState::Speaking);
}

#[tokio::test]
async fn test_emphasized_reply_becomes_one_message_per_segment() {
    let mut server = Server::new_async().await;
    mock_reply(&mut server, "fertilizer?", "**Apply** nitrogen now").await;
    let (mut panel, _, _) = panel_for(&server);

    let pending = panel.submit("fertilizer?").unwrap();
    let seq = pending.seq();
    let outcome = panel.apply_reply(seq, pending.await);

    assert_eq!(outcome.appended, 2);
    let messages = panel.store().snapshot();
    let reply = &messages[messages.len() - 2..];
    assert_eq!(reply[0].text, "Apply");
    assert!(reply[0].emphasis);
    assert_eq!(reply[0].origin, Role::Assistant);
    assert_eq!(reply[1].text, "nitrogen now");
    assert!(!reply[1].emphasis);
}

#[tokio::test]
async fn test_failed_dispatch_appends_fallback_reply() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/ask")
        .with_status(503)
        .create_async()
        .await;
    let (mut panel, _, voice) = panel_for(&server);

    let pending = panel.submit("anything").unwrap();
    let seq = pending.seq();
    let outcome = panel.apply_reply(seq, pending.await);

    assert_eq!(outcome.appended, 1);
    assert!(!outcome.spoke);
    assert_eq!(texts(&panel).last().map(String::as_str), Some(FALLBACK_REPLY));
    assert!(voice.state.lock().spoken.is_empty());
    // The panel stays interactive
    assert_eq!(panel.speech_state(), SpeechState::Idle);
}

#[tokio::test]
async fn test_stale_reply_is_appended_but_never_spoken() {
    let mut server = Server::new_async().await;
    mock_reply(&mut server, "first", "old answer").await;
    mock_reply(&mut server, "second", "new answer").await;
    let (mut panel, _, voice) = panel_for(&server);

    let first = panel.submit("first").unwrap();
    let second = panel.submit("second").unwrap();
    let (first_seq, second_seq) = (first.seq(), second.seq());
    assert!(second_seq > first_seq);

    // The newer turn completes first and starts speaking
    let outcome = panel.apply_reply(second_seq, second.await);
    assert!(outcome.spoke);

    // The superseded reply still lands in history, silently
    let outcome = panel.apply_reply(first_seq, first.await);
    assert_eq!(outcome.appended, 1);
    assert!(!outcome.spoke);

    let history = texts(&panel);
    assert!(history.contains(&"old answer".to_string()));
    assert!(history.contains(&"new answer".to_string()));
    assert_eq!(voice.state.lock().spoken, vec!["new answer"]);
    assert_eq!(panel.speech_state(), SpeechState::Speaking);
}

#[tokio::test]
async fn test_sequential_turns_interleave_in_order() {
    let mut server = Server::new_async().await;
    let turns = [("q1", "a1"), ("q2", "a2"), ("q3", "a3")];
    for (question, answer) in turns {
        mock_reply(&mut server, question, answer).await;
    }
    let (mut panel, _, _) = panel_for(&server);

    for (question, _) in turns {
        let pending = panel.submit(question).unwrap();
        let seq = pending.seq();
        panel.apply_reply(seq, pending.await);
    }

    assert_eq!(
        texts(&panel),
        vec![
            "Hi! How can I help you today?",
            "q1",
            "a1",
            "q2",
            "a2",
            "q3",
            "a3"
        ]
    );
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let server = Server::new_async().await;
    let (mut panel, _, _) = panel_for(&server);
    assert!(panel.submit("   ").is_none());
    assert_eq!(panel.store().len(), 1);
    assert_eq!(panel.speech_state(), SpeechState::Idle);
}

#[tokio::test]
async fn test_recognition_unavailable_leaves_panel_usable() {
    let mut server = Server::new_async().await;
    mock_reply(&mut server, "typed instead", "typed reply").await;
    let config = PanelConfig::default()
        .with_endpoint(format!("{}/ask", server.url()))
        .without_auto_speak();
    let mut panel =
        AssistantPanel::new(config, Box::new(NullRecognition), Box::new(NullSynthesis)).unwrap();

    let err = panel.start_voice_input().unwrap_err();
    assert!(matches!(err, AssistantError::CapabilityUnavailable(_)));
    assert_eq!(panel.speech_state(), SpeechState::Idle);

    // Typed input still works end to end
    let pending = panel.submit("typed instead").unwrap();
    let seq = pending.seq();
    let outcome = panel.apply_reply(seq, pending.await);
    assert_eq!(outcome.appended, 1);
    assert!(!outcome.spoke);
}

#[tokio::test]
async fn test_voice_input_uses_current_language_locale() {
    let server = Server::new_async().await;
    let (mut panel, mic, _) = panel_for(&server);

    panel.set_language(Language::Kannada);
    let session = panel.start_voice_input().unwrap();
    assert_eq!(panel.speech_state(), SpeechState::Listening);
    assert_eq!(mic.state.lock().started, vec![(session, "kn-IN".to_string())]);

    let transcript = panel.recognition_result(session, "yava bele".into());
    assert_eq!(transcript.as_deref(), Some("yava bele"));
    assert_eq!(panel.speech_state(), SpeechState::Idle);
}

#[tokio::test]
async fn test_submit_while_listening_stops_capture_before_reply_speaks() {
    let mut server = Server::new_async().await;
    mock_reply(&mut server, "typed over voice", "spoken reply").await;
    let (mut panel, mic, voice) = panel_for(&server);

    let session = panel.start_voice_input().unwrap();
    assert_eq!(panel.speech_state(), SpeechState::Listening);

    // Typing completes the user's input; the capture session must not
    // survive the submission
    let pending = panel.submit("typed over voice").unwrap();
    let seq = pending.seq();
    assert!(mic.state.lock().aborted.contains(&session));
    assert_eq!(panel.speech_state(), SpeechState::AwaitingReply);

    let outcome = panel.apply_reply(seq, pending.await);
    assert!(outcome.spoke);
    // Only the utterance is active; recognition ended before playback began
    assert_eq!(panel.speech_state(), SpeechState::Speaking);
    assert!(voice.state.lock().active.is_some());

    // A result from the aborted session is dropped, not applied
    assert!(panel.recognition_result(session, "late transcript".into()).is_none());
    assert_eq!(panel.speech_state(), SpeechState::Speaking);
}

#[tokio::test]
async fn test_recognition_error_leaves_history_untouched() {
    let server = Server::new_async().await;
    let (mut panel, _, _) = panel_for(&server);

    let session = panel.start_voice_input().unwrap();
    let err = panel.recognition_error(session, "no-speech").unwrap();
    assert!(matches!(err, AssistantError::RecognitionFailed(_)));
    assert_eq!(panel.store().len(), 1);
    assert_eq!(panel.speech_state(), SpeechState::Idle);
}

#[tokio::test]
async fn test_toggle_pauses_and_resumes_playback() {
    let mut server = Server::new_async().await;
    mock_reply(&mut server, "q", "a").await;
    let (mut panel, _, voice) = panel_for(&server);

    let pending = panel.submit("q").unwrap();
    let seq = pending.seq();
    panel.apply_reply(seq, pending.await);
    assert_eq!(panel.speech_state(), SpeechState::Speaking);

    panel.toggle_speech();
    assert_eq!(panel.speech_state(), SpeechState::Paused);
    assert!(voice.state.lock().paused);

    panel.toggle_speech();
    assert_eq!(panel.speech_state(), SpeechState::Speaking);
}

#[tokio::test]
async fn test_reset_keeps_in_flight_request() {
    let mut server = Server::new_async().await;
    mock_reply(&mut server, "q", "late answer").await;
    let (mut panel, _, _) = panel_for(&server);

    let pending = panel.submit("q").unwrap();
    let seq = pending.seq();
    panel.reset_conversation();
    assert_eq!(panel.store().len(), 1);

    // The in-flight request still lands when it returns
    panel.apply_reply(seq, pending.await);
    assert_eq!(
        texts(&panel),
        vec!["Hi! How can I help you today?", "late answer"]
    );
}

#[tokio::test]
async fn test_close_cancels_both_voice_resources() {
    let mut server = Server::new_async().await;
    mock_reply(&mut server, "q", "a").await;
    let (mut panel, mic, voice) = panel_for(&server);

    let pending = panel.submit("q").unwrap();
    let seq = pending.seq();
    panel.apply_reply(seq, pending.await);
    let session = panel.start_voice_input().unwrap();

    panel.close();
    assert_eq!(panel.speech_state(), SpeechState::Idle);
    assert!(mic.state.lock().aborted.contains(&session));
    assert!(voice.state.lock().active.is_none());
}

#[tokio::test]
async fn test_playback_end_event_returns_panel_to_idle() {
    let mut server = Server::new_async().await;
    mock_reply(&mut server, "q", "a").await;
    let (mut panel, _, voice) = panel_for(&server);

    let pending = panel.submit("q").unwrap();
    let seq = pending.seq();
    panel.apply_reply(seq, pending.await);

    let utterance = voice.state.lock().active.unwrap();
    voice.state.lock().active = None;
    panel.playback_ended(utterance);
    assert_eq!(panel.speech_state(), SpeechState::Idle);
}
