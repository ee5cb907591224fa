//! Game endpoints: content lookup, progress updates, static files

mod common;

use common::{status_and_json, TestServer};
use letrasgo::domain::{Chapter, Completion, Difficulty, Mode};
use letrasgo::puzzle::{
    transition, Classification, FlowEvent, GameContext, PuzzleSession, RecordingPresenter, Screen,
};
use serde_json::json;

fn chapter(n: u8) -> Chapter {
    Chapter::new(n).unwrap()
}

#[test]
fn test_content_requires_auth() {
    let server = TestServer::start();
    let (status, body) =
        status_and_json(ureq::get(&server.url("/api/game/content/words/easy/1")).call());
    assert_eq!(status, 401);
    assert_eq!(body["success"], false);
}

#[test]
fn test_content_lookup() {
    let server = TestServer::start();
    let client = server.registered_client("lucia");

    let spec = client.content(Mode::Words, Difficulty::Easy, chapter(1)).unwrap();
    assert_eq!(spec.solution, "casa");
    assert_eq!(spec.pieces, vec!["ca", "sa"]);

    let spec = client
        .content(Mode::Sentences, Difficulty::Easy, chapter(1))
        .unwrap();
    assert_eq!(spec.solution, "El gato come");

    // Not in the sample set
    let err = client
        .content(Mode::Sentences, Difficulty::Difficult, chapter(1))
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[test]
fn test_content_bad_parameters() {
    let server = TestServer::start();
    let client = server.registered_client("lucia");
    let token = client.token().unwrap().to_string();

    for path in [
        "/api/game/content/letters/easy/1",
        "/api/game/content/words/hard/1",
        "/api/game/content/words/easy/11",
        "/api/game/content/words/easy/x",
        "/api/game/content/words/easy",
    ] {
        let (status, _) = status_and_json(
            ureq::get(&server.url(path))
                .set("Authorization", &format!("Bearer {token}"))
                .call(),
        );
        assert_eq!(status, 400, "{path}");
    }

    // Legacy difficulty spelling
    let (status, body) = status_and_json(
        ureq::get(&server.url("/api/game/content/words/facil/2"))
            .set("Authorization", &format!("Bearer {token}"))
            .call(),
    );
    assert_eq!(status, 200);
    assert_eq!(body["data"]["solution"], "gato");
}

#[test]
fn test_progress_update_and_persistence() {
    let server = TestServer::start();
    let mut client = server.registered_client("lucia");

    let update = client
        .update_progress(&Completion {
            mode: Mode::Words,
            difficulty: Difficulty::Easy,
            chapter: chapter(1),
            score_to_add: 10,
        })
        .unwrap();
    assert_eq!(update.score, 10);
    assert_eq!(update.progress.unlocked(Mode::Words, Difficulty::Easy), chapter(2));

    // Survives a new session
    client.logout().unwrap();
    let profile = client.login("lucia", "secreto").unwrap();
    assert_eq!(profile.score, 10);
    assert_eq!(profile.progress.unlocked(Mode::Words, Difficulty::Easy), chapter(2));
}

#[test]
fn test_progress_wire_format() {
    let server = TestServer::start();
    let client = server.registered_client("lucia");
    let auth = format!("Bearer {}", client.token().unwrap());

    let (status, body) = status_and_json(
        ureq::put(&server.url("/api/game/progress"))
            .set("Authorization", &auth)
            .send_json(json!({
                "mode": "sentences", "difficulty": "normal", "chapter": "5", "scoreToAdd": 10
            })),
    );
    assert_eq!(status, 200);
    assert_eq!(body["data"]["score"], 10);
    assert_eq!(body["data"]["progress"]["sentences"]["normal"]["unlocked"], 6);

    let (status, body) = status_and_json(
        ureq::put(&server.url("/api/game/progress"))
            .set("Authorization", &auth)
            .send_json(json!({ "mode": "sentences", "difficulty": "normal", "chapter": 5 })),
    );
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);

    let (status, _) = status_and_json(
        ureq::put(&server.url("/api/game/progress"))
            .set("Authorization", &auth)
            .set("Content-Type", "application/json")
            .send_string("{not json"),
    );
    assert_eq!(status, 400);

    let (status, _) = status_and_json(ureq::put(&server.url("/api/game/progress")).send_json(
        json!({ "mode": "words", "difficulty": "easy", "chapter": 1, "scoreToAdd": 10 }),
    ));
    assert_eq!(status, 401);

    // Rejected updates left nothing behind
    let profile = client.check().unwrap().unwrap();
    assert_eq!(profile.score, 10);
}

#[test]
fn test_oversized_body_is_rejected() {
    let server = TestServer::start_with(|c| c.server.max_body_bytes = 64);
    let (status, _) = status_and_json(
        ureq::post(&server.url("/api/auth/register"))
            .send_json(json!({ "username": "lucia", "password": "x".repeat(200) })),
    );
    assert_eq!(status, 413);
}

#[test]
fn test_players_progress_independently() {
    let server = TestServer::start();
    let lucia = server.registered_client("lucia");
    let pedro = server.registered_client("pedro");

    let completion = |n: u8| Completion {
        mode: Mode::Words,
        difficulty: Difficulty::Normal,
        chapter: chapter(n),
        score_to_add: 10,
    };
    lucia.update_progress(&completion(4)).unwrap();
    pedro.update_progress(&completion(1)).unwrap();
    lucia.update_progress(&completion(2)).unwrap();

    let lucia = lucia.check().unwrap().unwrap();
    let pedro = pedro.check().unwrap().unwrap();
    assert_eq!(lucia.score, 20);
    assert_eq!(lucia.progress.unlocked(Mode::Words, Difficulty::Normal), chapter(5));
    assert_eq!(pedro.score, 10);
    assert_eq!(pedro.progress.unlocked(Mode::Words, Difficulty::Normal), chapter(2));
}

#[test]
fn test_full_round_casa() {
    let server = TestServer::start();
    let client = server.registered_client("lucia");
    let profile = client.check().unwrap().unwrap();

    let mut ctx = GameContext::new(profile.into());
    for event in [
        FlowEvent::ChooseMode(Mode::Words),
        FlowEvent::ChooseDifficulty(Difficulty::Easy),
        FlowEvent::ChooseChapter(chapter(1)),
    ] {
        ctx = transition(&ctx, event).unwrap();
    }
    assert!(matches!(ctx.screen, Screen::Playing { .. }));

    let spec = client.content(Mode::Words, Difficulty::Easy, chapter(1)).unwrap();
    let presenter = RecordingPresenter::default();
    let mut session = PuzzleSession::start_in_order(spec, &presenter).unwrap();
    assert_eq!(session.drop_piece(0).unwrap(), Classification::InProgress);
    assert_eq!(session.drop_piece(1).unwrap(), Classification::Correct);

    ctx = transition(&ctx, FlowEvent::PuzzleSolved { score_to_add: 10 }).unwrap();
    assert_eq!(ctx.player.score, 10);

    let update = client
        .update_progress(&Completion {
            mode: Mode::Words,
            difficulty: Difficulty::Easy,
            chapter: chapter(1),
            score_to_add: 10,
        })
        .unwrap();
    ctx = transition(
        &ctx,
        FlowEvent::ProgressSynced {
            score: update.score,
            progress: update.progress,
        },
    )
    .unwrap();

    assert_eq!(ctx.player.score, 10);
    assert_eq!(ctx.player.progress.unlocked(Mode::Words, Difficulty::Easy), chapter(2));
    assert!(transition(&ctx, FlowEvent::ChooseChapter(chapter(2))).is_ok());
    assert!(transition(&ctx, FlowEvent::ChooseChapter(chapter(3))).is_err());
}

#[test]
fn test_static_pages() {
    let server = TestServer::start();

    for (path, needle) in [("/", "LetrasGo"), ("/landing", "Entrar"), ("/game", "Juego")] {
        let resp = ureq::get(&server.url(path)).call().unwrap();
        assert!(resp.content_type().starts_with("text/html"), "{path}");
        assert!(resp.into_string().unwrap().contains(needle), "{path}");
    }

    let resp = ureq::get(&server.url("/js/game.js")).call().unwrap();
    assert!(resp.content_type().starts_with("text/javascript"));

    let (status, _) = status_and_json(ureq::get(&server.url("/missing.css")).call());
    assert_eq!(status, 404);
    let (status, _) = status_and_json(ureq::get(&server.url("/js/../../secret.txt")).call());
    assert_eq!(status, 404);
}

#[test]
fn test_ping_and_unknown_api_route() {
    let server = TestServer::start();
    assert_eq!(server.client().ping().unwrap(), env!("CARGO_PKG_VERSION"));

    let (status, body) = status_and_json(ureq::get(&server.url("/api/nope")).call());
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
}

#[test]
fn test_method_not_allowed_outside_api() {
    let server = TestServer::start();
    let (status, body) = status_and_json(ureq::delete(&server.url("/index.html")).call());
    assert_eq!(status, 405);
    assert_eq!(body["success"], false);
}

#[test]
fn test_score_beyond_storage_range_is_a_bad_request() {
    let server = TestServer::start();
    let client = server.registered_client("lucia");
    let auth = format!("Bearer {}", client.token().unwrap());

    let (status, body) = status_and_json(
        ureq::put(&server.url("/api/game/progress"))
            .set("Authorization", &auth)
            .send_json(json!({
                "mode": "words", "difficulty": "easy", "chapter": 1,
                "scoreToAdd": 9_223_372_036_854_775_808u64
            })),
    );
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(client.check().unwrap().unwrap().score, 0);
}
