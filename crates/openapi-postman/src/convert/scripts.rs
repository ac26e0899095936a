//! JavaScript hooks attached to the generated collection.
//!
//! Templates use `%NAME%` placeholders. Substituted values are JSON
//! literals, which are also valid JavaScript literals.

use postman_core::{Event, Listen};
use serde::Serialize;

use super::ConvertConfig;
use crate::config::FieldInjector;

const PRE_REQUEST_TEMPLATE: &str = r"
// Token check before every request in the collection
const token = pm.environment.get('access_token');
const tokenExpiry = pm.environment.get('token_expiry');
const requestUrl = pm.request.url.toString();

const isPublicEndpoint =
    %PUBLIC_CHECKS%;

if (isPublicEndpoint) {
    console.log('Public endpoint, no authentication required');
} else if (!token || String(token).trim() === '') {
    console.log('WARNING: no access token found, this request may fail with 401 Unauthorized');
    console.log('Call a login endpoint first; the token is captured automatically');
} else if (tokenExpiry && Date.now() > parseInt(tokenExpiry, 10)) {
    console.log('WARNING: access token has expired, log in again');
    pm.environment.set('access_token', '');
} else {
    const auth = pm.request.auth;
    if (auth && auth.type === 'noauth') {
        console.log('WARNING: request overrides auth with noauth, token will not be sent');
    } else {
        const length = String(token).length;
        console.log('Bearer token sent in the Authorization header (' + length + ' characters)');
    }
}
";

const TEST_TEMPLATE: &str = r"
// Capture credentials from successful responses
const TOKEN_FIELDS = %TOKEN_FIELDS%;
const ROLE_FIELDS = %ROLE_FIELDS%;
const USER_ID_FIELDS = %USER_ID_FIELDS%;
const WRAPPERS = %WRAPPERS%;
const TOKEN_LIFETIME_MS = %TOKEN_LIFETIME_MS%;
const REQUEST_CAPTURES = %REQUEST_CAPTURES%;

function pickField(body, fields) {
    const scopes = [body].concat(WRAPPERS.map(function (w) { return body[w]; }));
    for (const scope of scopes) {
        if (!scope || typeof scope !== 'object') {
            continue;
        }
        for (const field of fields) {
            const value = scope[field];
            if (value !== undefined && value !== null && value !== '') {
                return value;
            }
        }
    }
    return undefined;
}

if (pm.response.code >= 200 && pm.response.code < 300) {
    let body = null;
    try {
        body = pm.response.json();
    } catch (e) {
        body = null;
    }

    if (body && typeof body === 'object') {
        const token = pickField(body, TOKEN_FIELDS);
        if (token) {
            pm.environment.set('access_token', token);
            pm.environment.set('token_expiry', String(Date.now() + TOKEN_LIFETIME_MS));
            console.log('Access token captured and saved');
        }

        const role = pickField(body, ROLE_FIELDS);
        if (role) {
            pm.environment.set('role', String(role).toLowerCase());
            console.log('Role captured: ' + String(role).toLowerCase());
        }

        const userId = pickField(body, USER_ID_FIELDS);
        if (userId !== undefined) {
            pm.environment.set('user_id', String(userId));
            console.log('User id captured: ' + userId);
        }
    }

    let requestBody = null;
    try {
        requestBody = JSON.parse(pm.request.body ? pm.request.body.raw : '');
    } catch (e) {
        requestBody = null;
    }

    const requestPath = '/' + pm.request.url.path.join('/');
    for (const capture of REQUEST_CAPTURES) {
        const value = requestBody ? requestBody[capture.field] : undefined;
        if (requestPath.includes(capture.path) && value !== undefined) {
            pm.environment.set(capture.variable, String(value));
            console.log(capture.variable + ' captured from request');
        }
    }
}
";

const INJECTOR_TEMPLATE: &str = r"
// Inject a stored environment value into the request body
const stored = pm.environment.get(%VARIABLE%);
const defaults = %DEFAULTS%;

if (stored) {
    const raw = pm.request.body ? pm.request.body.raw : '';
    let payload = null;
    if (raw && String(raw).trim() !== '') {
        try {
            payload = JSON.parse(raw);
        } catch (e) {
            console.log('WARNING: request body is not valid JSON, using default body');
            payload = null;
        }
    }
    if (!payload || typeof payload !== 'object' || Array.isArray(payload)) {
        payload = Object.assign({}, defaults);
    }
    for (const key of Object.keys(defaults)) {
        if (payload[key] === undefined || payload[key] === null || payload[key] === '') {
            payload[key] = defaults[key];
        }
    }
    payload[%FIELD%] = stored;

    try {
        pm.request.body.update({
            mode: 'raw',
            raw: JSON.stringify(payload, null, 2),
            options: { raw: { language: 'json' } }
        });
        console.log('Using stored ' + %VARIABLE% + ': ' + stored);
    } catch (e) {
        console.log('WARNING: could not update request body: ' + e.message);
    }
} else {
    console.log('WARNING: no stored ' + %VARIABLE% + ' found');
    console.log('Call the endpoint that captures it first');
}
";

/// The collection-level pre-request and test hooks.
#[must_use]
pub fn collection_events(config: &ConvertConfig) -> Vec<Event> {
    vec![
        Event::javascript(Listen::Prerequest, pre_request_script(&config.public_paths)),
        Event::javascript(Listen::Test, test_script(config)),
    ]
}

/// A request-level pre-request hook for a field injector.
#[must_use]
pub fn injector_event(injector: &FieldInjector) -> Event {
    let exec = render(
        INJECTOR_TEMPLATE,
        &[
            ("VARIABLE", js_literal(&injector.variable)),
            ("FIELD", js_literal(&injector.field)),
            ("DEFAULTS", js_literal(&injector.defaults)),
        ],
    );
    Event::javascript(Listen::Prerequest, exec)
}

fn pre_request_script(public_paths: &[String]) -> Vec<String> {
    render(
        PRE_REQUEST_TEMPLATE,
        &[("PUBLIC_CHECKS", public_checks(public_paths))],
    )
}

fn test_script(config: &ConvertConfig) -> Vec<String> {
    let fields = &config.credentials;
    let lifetime_ms = u64::from(fields.token_lifetime_hours) * 60 * 60 * 1000;
    render(
        TEST_TEMPLATE,
        &[
            ("TOKEN_FIELDS", js_literal(&fields.token_fields)),
            ("ROLE_FIELDS", js_literal(&fields.role_fields)),
            ("USER_ID_FIELDS", js_literal(&fields.user_id_fields)),
            ("WRAPPERS", js_literal(&fields.wrappers)),
            ("TOKEN_LIFETIME_MS", lifetime_ms.to_string()),
            ("REQUEST_CAPTURES", js_literal(&config.request_captures)),
        ],
    )
}

/// One boolean clause per public path, joined with `||`.
fn public_checks(public_paths: &[String]) -> String {
    if public_paths.is_empty() {
        return "false".to_string();
    }
    public_paths
        .iter()
        .map(|path| {
            if path == "/" {
                "requestUrl === pm.environment.get('base_url') + '/'".to_string()
            } else {
                format!("requestUrl.includes({})", js_literal(path))
            }
        })
        .collect::<Vec<_>>()
        .join(" ||\n    ")
}

fn js_literal<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn render(template: &str, params: &[(&str, String)]) -> Vec<String> {
    let mut text = template.trim_matches('\n').to_string();
    for (name, value) in params {
        text = text.replace(&format!("%{name}%"), value);
    }
    text.lines().map(ToString::to_string).collect()
}
