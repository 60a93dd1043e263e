//! Cloudflare Worker serving the bingo API, one Durable Object per visitor.

use bingo_core::{
    BingoError, FixedClock, GameSession, Identifier, IdentityMaterial, UserRecord,
};
use bingo_protocol::{
    BoardResponse, Endpoint, ErrorResponse, PreferenceRequest, PreferenceResponse,
    RegenerateResponse, TOKEN_HEADER, ToggleRequest, ToggleResponse,
};
use serde::Serialize;
use worker::*;

pub use config::*;
pub use staged::*;

mod config;
mod staged;

const BOARDS_BINDING: &str = "BOARDS";
const RECORD_KEY: &str = "record";
const ADDRESS_HEADER: &str = "cf-connecting-ip";
const USER_AGENT_HEADER: &str = "user-agent";

#[event(start)]
fn start() {
    console_error_panic_hook::set_once();
}

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let config = match load_config(&env) {
        Ok(config) => config,
        Err(err) => return Response::error(err.to_string(), 500),
    };

    if Endpoint::route(method_name(&req.method()), &req.path()).is_none() {
        return error_response(&ErrorResponse::not_found());
    }

    let identifier = match config.resolver.resolve(&identity_material(&req)?) {
        Ok(identifier) => identifier,
        Err(err) => return error_response(&ErrorResponse::from(&err)),
    };

    let namespace = env.durable_object(BOARDS_BINDING)?;
    let stub = namespace.get_by_name(identifier.as_str())?;
    stub.fetch_with_request(req).await
}

fn load_config(env: &Env) -> std::result::Result<WorkerConfig, ConfigError> {
    let config = WorkerConfig::from_vars(|key| {
        env.secret(key)
            .or_else(|_| env.var(key))
            .ok()
            .map(|value| value.to_string())
    })?;
    // already installed on a warm isolate
    let _ = console_log::init_with_level(config.log_level);
    Ok(config)
}

fn method_name(method: &Method) -> &'static str {
    match method {
        Method::Get => "GET",
        Method::Post => "POST",
        _ => "",
    }
}

fn identity_material(req: &Request) -> Result<IdentityMaterial> {
    let headers = req.headers();
    Ok(IdentityMaterial {
        token: headers.get(TOKEN_HEADER)?,
        address: headers.get(ADDRESS_HEADER)?,
        user_agent: headers.get(USER_AGENT_HEADER)?,
    })
}

fn json_response<T: Serialize>(body: &T, status: u16) -> Result<Response> {
    Ok(Response::from_json(body)?.with_status(status))
}

fn error_response(err: &ErrorResponse) -> Result<Response> {
    json_response(err, err.status())
}

fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

enum Action {
    Board,
    Toggle(ToggleRequest),
    Regenerate,
    Preference(PreferenceRequest),
}

/// Owns the record of a single visitor; requests for that visitor are serialized here.
#[durable_object]
pub struct BoardObject {
    state: State,
    env: Env,
}

impl DurableObject for BoardObject {
    fn new(state: State, env: Env) -> Self {
        Self { state, env }
    }

    async fn fetch(&self, req: Request) -> Result<Response> {
        let mut req = req;
        let config = match load_config(&self.env) {
            Ok(config) => config,
            Err(err) => return Response::error(err.to_string(), 500),
        };
        let Some(endpoint) = Endpoint::route(method_name(&req.method()), &req.path()) else {
            return error_response(&ErrorResponse::not_found());
        };
        let identifier = match config.resolver.resolve(&identity_material(&req)?) {
            Ok(identifier) => identifier,
            Err(err) => return error_response(&ErrorResponse::from(&err)),
        };

        let action = match endpoint {
            Endpoint::Board => Action::Board,
            Endpoint::Click => match req.json::<ToggleRequest>().await {
                Ok(body) => Action::Toggle(body),
                Err(err) => {
                    return error_response(&ErrorResponse::bad_request(format!(
                        "Invalid click body: {err}"
                    )));
                }
            },
            Endpoint::NewBoard => Action::Regenerate,
            Endpoint::Preference => match req.json::<PreferenceRequest>().await {
                Ok(body) => Action::Preference(body),
                Err(err) => {
                    return error_response(&ErrorResponse::bad_request(format!(
                        "Invalid preference body: {err}"
                    )));
                }
            },
        };

        let store = StagedStore::new(identifier.clone(), self.load_record().await);
        let today = config.today(js_sys::Date::now() as i64);
        let result = {
            let session = GameSession::new(
                &store,
                config.deck,
                config.rules,
                FixedClock(today),
                js_random_seed(),
            );
            run(&session, &identifier, action)
        };

        if let Some(record) = store.into_dirty() {
            if let Err(err) = self.save_record(&record).await {
                log::error!("{identifier}: {err}");
                return error_response(&ErrorResponse::from(&err));
            }
        }

        match result {
            Ok(response) => response,
            Err(err) => {
                log::warn!("{} for {identifier}: {err}", endpoint.path());
                error_response(&ErrorResponse::from(&err))
            }
        }
    }
}

impl BoardObject {
    async fn load_record(&self) -> bingo_core::Result<Option<UserRecord>> {
        let raw: Option<String> = self
            .state
            .storage()
            .get(RECORD_KEY)
            .await
            .map_err(|err| BingoError::StoreUnavailable(err.to_string()))?;
        raw.map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(|err| BingoError::StoreUnavailable(format!("corrupt record: {err}")))
    }

    async fn save_record(&self, record: &UserRecord) -> bingo_core::Result<()> {
        let raw = serde_json::to_string(record)
            .map_err(|err| BingoError::StoreUnavailable(err.to_string()))?;
        self.state
            .storage()
            .put(RECORD_KEY, raw)
            .await
            .map_err(|err| BingoError::StoreUnavailable(err.to_string()))
    }
}

fn run(
    session: &GameSession<&StagedStore, FixedClock>,
    identifier: &Identifier,
    action: Action,
) -> bingo_core::Result<Result<Response>> {
    Ok(match action {
        Action::Board => {
            let record = session.get_or_create_board(identifier)?;
            json_response(&BoardResponse::from(record), 200)
        }
        Action::Toggle(ToggleRequest { row, col }) => {
            let outcome = session.toggle_cell(identifier, row, col)?;
            json_response(&ToggleResponse::new(outcome.board, outcome.completed), 200)
        }
        Action::Regenerate => {
            let board = session.regenerate_board(identifier)?;
            json_response(&RegenerateResponse::new(board), 200)
        }
        Action::Preference(PreferenceRequest { preference }) => {
            let preference = session.set_preference(identifier, preference)?;
            json_response(&PreferenceResponse::new(preference), 200)
        }
    })
}
