use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use rack_core::ID;
use rack_engine::EngineError;
use rack_hosting::*;

/// Maps engine error categories onto HTTP statuses.
fn reject(error: EngineError) -> HttpResponse {
    let body = error.to_string();
    match error {
        EngineError::NotFound(_) => HttpResponse::NotFound().body(body),
        EngineError::Validation(_) => HttpResponse::BadRequest().body(body),
        EngineError::Conflict(_) => HttpResponse::Conflict().body(body),
        EngineError::IllegalAction(_)
        | EngineError::NotYourTurn
        | EngineError::MustRebuy
        | EngineError::MustCashout => HttpResponse::BadRequest().body(body),
        EngineError::Internal(_) => HttpResponse::InternalServerError().body(body),
    }
}

pub async fn create(lobby: web::Data<Lobby>, req: web::Json<CreateRoomRequest>) -> impl Responder {
    match lobby.into_inner().create_room(req.into_inner()).await {
        Ok(admitted) => HttpResponse::Ok().json(admitted),
        Err(e) => reject(e),
    }
}

pub async fn join(lobby: web::Data<Lobby>, req: web::Json<JoinRoomRequest>) -> impl Responder {
    match lobby.into_inner().join_room(req.into_inner()).await {
        Ok(admitted) => HttpResponse::Ok().json(admitted),
        Err(e) => reject(e),
    }
}

pub async fn list(lobby: web::Data<Lobby>) -> impl Responder {
    HttpResponse::Ok().json(lobby.list_rooms().await)
}

pub async fn player_room(lobby: web::Data<Lobby>, path: web::Path<String>) -> impl Responder {
    let player = ID::from(path.into_inner().as_str());
    let room_id = lobby.find_player(&player).await.map(|id| id.to_string());
    HttpResponse::Ok().json(ActiveRoom { room_id })
}

pub async fn leave(lobby: web::Data<Lobby>, path: web::Path<(String, String)>) -> impl Responder {
    let (room_id, player_id) = path.into_inner();
    match lobby
        .into_inner()
        .leave_room(&ID::from(room_id.as_str()), &ID::from(player_id.as_str()))
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        Err(e) => reject(e),
    }
}

pub async fn random_profile() -> impl Responder {
    HttpResponse::Ok().json(rack_hosting::random_profile())
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

pub async fn session(
    lobby: web::Data<Lobby>,
    path: web::Path<(String, String)>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let (room_id, player_id) = path.into_inner();
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            rack_hosting::session::serve(
                lobby.into_inner(),
                ID::from(room_id.as_str()),
                ID::from(player_id.as_str()),
                session,
                stream,
            )
            .await;
            response
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
