use std::collections::BTreeMap;

use crate::eval::protocol::EngineRequest;
use crate::foundation::core::{Seed, Tick};

/// Name of the entry point function a user script must define.
pub const ENTRY_POINT: &str = "draw";

/// Construct the engine request for one evaluation.
///
/// The generated program seeds the script's random-number source from the
/// seed binding, splices in the user source, calls the `draw` entry point —
/// passing the tick only when `draw` declares a parameter for it — and
/// evaluates to the `[token, serialize(tree)]` pair the engine reports back.
/// The `serialize` helper is provided by the engine runtime.
///
/// The token binding's name embeds the token value, so concurrent programs on
/// the same engine never shadow each other's binding. An absent tick binds
/// as 0; the entry point only receives it when its signature asks for it.
pub fn build_request(source: &str, seed: Seed, tick: Option<Tick>, token: u64) -> EngineRequest {
    let ident = format!("ident{token}");
    let program = format!(
        r#"
from host import {ident}, seed, tick
import random

random.seed(int(seed))
{source}
import inspect

result = None

if "tick" in inspect.signature({ENTRY_POINT}).parameters:
    result = [{ident}, serialize({ENTRY_POINT}(tick))]
else:
    result = [{ident}, serialize({ENTRY_POINT}())]

result
"#
    );

    let bindings = BTreeMap::from([
        (ident, token as i64),
        ("seed".to_owned(), seed.0),
        ("tick".to_owned(), tick.map_or(0, |t| t.0 as i64)),
    ]);

    EngineRequest { bindings, program }
}
