use super::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::model::{Envelope, Person};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

const DEFAULT_RESOURCE: &str = "pessoas";
const EXPORT_SEGMENT: &str = "exportar";

#[derive(Default)]
struct Backend {
    people: Vec<Person>,
    next_id: u64,
    exported_csv: Option<String>,
    failures_pending: usize,
    requests: Vec<ApiRequest>,
}

/// In-process backend for testing and demos. Does NOT persist data.
///
/// Answers exactly like the `/pessoas` HTTP service: the same envelopes,
/// status codes and messages, including server-side CSV generation on export.
pub struct MemoryTransport {
    resource: String,
    latency: Option<Duration>,
    inner: Mutex<Backend>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            resource: DEFAULT_RESOURCE.to_string(),
            latency: None,
            inner: Mutex::new(Backend {
                next_id: 1,
                ..Backend::default()
            }),
        }
    }

    /// Starts with the given records; new ids continue after the highest one.
    pub fn with_people(people: Vec<Person>) -> Self {
        let transport = Self::new();
        {
            let mut inner = transport.lock();
            inner.next_id = people.iter().map(|p| p.id).max().unwrap_or(0) + 1;
            inner.people = people;
        }
        transport
    }

    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = resource.trim_matches('/').to_string();
        self
    }

    /// Delays every response, so tests can observe requests in flight.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The next `count` sends fail as if the server were unreachable.
    pub fn fail_next(&self, count: usize) {
        self.lock().failures_pending = count;
    }

    pub fn people(&self) -> Vec<Person> {
        self.lock().people.clone()
    }

    /// Every request received so far, failed ones included.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// Contents of the last generated `pessoas.csv`.
    pub fn exported_csv(&self) -> Option<String> {
        self.lock().exported_csv.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn handle(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut inner = self.lock();
        inner.requests.push(request.clone());

        if inner.failures_pending > 0 {
            inner.failures_pending -= 1;
            return Err(TransportError("connection refused".to_string()));
        }

        let segments: Vec<&str> = request
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let response = match segments.as_slice() {
            [res] if *res == self.resource => match request.method {
                Method::Get => list(&inner),
                Method::Post => create(&mut inner, request.body.as_ref()),
                _ => not_allowed(),
            },
            [res, seg] if *res == self.resource && *seg == EXPORT_SEGMENT => {
                match request.method {
                    Method::Get => export(&mut inner),
                    _ => not_allowed(),
                }
            }
            [res, id] if *res == self.resource => match id.parse::<u64>() {
                Ok(id) => match request.method {
                    Method::Get => get(&inner, id),
                    Method::Put => update(&mut inner, id, request.body.as_ref()),
                    Method::Delete => delete(&mut inner, id),
                    Method::Post => not_allowed(),
                },
                Err(_) => not_found_route(),
            },
            _ => not_found_route(),
        };

        Ok(response)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.handle(&request)
    }
}

fn respond(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

fn failure(status: u16, message: &str) -> ApiResponse {
    respond(status, json!({ "success": false, "message": message }))
}

fn not_found() -> ApiResponse {
    failure(404, "Pessoa não encontrada")
}

fn not_found_route() -> ApiResponse {
    failure(404, "Recurso não encontrado")
}

fn not_allowed() -> ApiResponse {
    failure(405, "Método não permitido")
}

fn envelope<T: serde::Serialize>(status: u16, env: &Envelope<T>) -> ApiResponse {
    match serde_json::to_value(env) {
        Ok(body) => respond(status, body),
        Err(e) => failure(500, &format!("Erro interno: {}", e)),
    }
}

/// Validates a create/update body the way the service does.
fn parse_body(body: Option<&Value>) -> Result<(String, u32), ApiResponse> {
    let (nome, idade) = match body {
        Some(Value::Object(map)) => match (map.get("nome"), map.get("idade")) {
            (Some(nome), Some(idade)) => (nome, idade),
            _ => return Err(failure(400, "Nome e idade são obrigatórios")),
        },
        _ => return Err(failure(400, "Nome e idade são obrigatórios")),
    };

    let nome = match nome.as_str() {
        Some(n) => n.trim().to_string(),
        None => return Err(failure(400, "Nome e idade são obrigatórios")),
    };

    let idade = match idade {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let idade = match idade {
        Some(i) => i,
        None => return Err(failure(400, "Idade deve ser um número válido")),
    };

    if nome.is_empty() {
        return Err(failure(400, "Nome não pode estar vazio"));
    }
    if idade < 0 {
        return Err(failure(400, "Idade deve ser um número positivo"));
    }
    let idade =
        u32::try_from(idade).map_err(|_| failure(400, "Idade deve ser um número válido"))?;

    Ok((nome, idade))
}

fn list(inner: &Backend) -> ApiResponse {
    envelope(
        200,
        &Envelope::ok(inner.people.clone(), "Pessoas listadas com sucesso"),
    )
}

fn get(inner: &Backend, id: u64) -> ApiResponse {
    match inner.people.iter().find(|p| p.id == id) {
        Some(person) => envelope(200, &Envelope::ok(person.clone(), "Pessoa encontrada")),
        None => not_found(),
    }
}

fn create(inner: &mut Backend, body: Option<&Value>) -> ApiResponse {
    let (nome, idade) = match parse_body(body) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    let person = Person::new(inner.next_id, nome, idade);
    inner.next_id += 1;
    inner.people.push(person.clone());
    envelope(201, &Envelope::ok(person, "Pessoa criada com sucesso"))
}

fn update(inner: &mut Backend, id: u64, body: Option<&Value>) -> ApiResponse {
    let (nome, idade) = match parse_body(body) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    match inner.people.iter_mut().find(|p| p.id == id) {
        Some(person) => {
            person.nome = nome;
            person.idade = idade;
            let updated = person.clone();
            envelope(200, &Envelope::ok(updated, "Pessoa atualizada com sucesso"))
        }
        None => not_found(),
    }
}

fn delete(inner: &mut Backend, id: u64) -> ApiResponse {
    let before = inner.people.len();
    inner.people.retain(|p| p.id != id);
    if inner.people.len() == before {
        return not_found();
    }
    envelope(
        200,
        &Envelope::message_only(true, "Pessoa excluída com sucesso"),
    )
}

fn export(inner: &mut Backend) -> ApiResponse {
    let mut csv = String::from("ID,Nome,Idade\n");
    for p in &inner.people {
        csv.push_str(&format!("{},{},{}\n", p.id, csv_field(&p.nome), p.idade));
    }
    inner.exported_csv = Some(csv);
    envelope(
        200,
        &Envelope::message_only(true, "Dados exportados para pessoas.csv com sucesso"),
    )
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn send(t: &MemoryTransport, method: Method, path: &str, body: Option<Value>) -> ApiResponse {
        let mut req = ApiRequest::new(method, path);
        req.body = body;
        t.send(req).await.unwrap()
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let t = MemoryTransport::new();
        let a = send(&t, Method::Post, "/pessoas", Some(json!({"nome": "Ana", "idade": 30}))).await;
        let b = send(&t, Method::Post, "/pessoas", Some(json!({"nome": "Bia", "idade": 25}))).await;
        assert_eq!(a.status, 201);
        assert_eq!(b.status, 201);
        let people = t.people();
        assert_eq!(people[0].id, 1);
        assert_eq!(people[1].id, 2);
    }

    #[tokio::test]
    async fn seeded_ids_continue_after_max() {
        let t = MemoryTransport::with_people(vec![Person::new(7, "Ana", 30)]);
        send(&t, Method::Post, "/pessoas", Some(json!({"nome": "Bia", "idade": 1}))).await;
        assert_eq!(t.people()[1].id, 8);
    }

    #[tokio::test]
    async fn rejects_invalid_bodies() {
        let t = MemoryTransport::new();
        let missing = send(&t, Method::Post, "/pessoas", Some(json!({"nome": "Ana"}))).await;
        assert_eq!(missing.status, 400);
        assert!(missing.body.contains("obrigatórios"));

        let blank = send(&t, Method::Post, "/pessoas", Some(json!({"nome": "  ", "idade": 3}))).await;
        assert!(blank.body.contains("Nome não pode estar vazio"));

        let negative = send(&t, Method::Post, "/pessoas", Some(json!({"nome": "A", "idade": -1}))).await;
        assert!(negative.body.contains("positivo"));

        let garbage = send(&t, Method::Post, "/pessoas", Some(json!({"nome": "A", "idade": "x"}))).await;
        assert!(garbage.body.contains("número válido"));

        assert!(t.people().is_empty());
    }

    #[tokio::test]
    async fn missing_records_are_404() {
        let t = MemoryTransport::new();
        assert_eq!(send(&t, Method::Get, "/pessoas/1", None).await.status, 404);
        assert_eq!(send(&t, Method::Delete, "/pessoas/1", None).await.status, 404);
        let put = send(&t, Method::Put, "/pessoas/1", Some(json!({"nome": "A", "idade": 1}))).await;
        assert_eq!(put.status, 404);
    }

    #[tokio::test]
    async fn export_generates_csv() {
        let t = MemoryTransport::with_people(vec![
            Person::new(1, "Ana", 30),
            Person::new(2, "Silva, João", 41),
        ]);
        let res = send(&t, Method::Get, "/pessoas/exportar", None).await;
        assert_eq!(res.status, 200);
        assert_eq!(
            t.exported_csv().unwrap(),
            "ID,Nome,Idade\n1,Ana,30\n2,\"Silva, João\",41\n"
        );
    }

    #[tokio::test]
    async fn injected_failures_are_transport_errors() {
        let t = MemoryTransport::new();
        t.fail_next(1);
        let err = t.send(ApiRequest::new(Method::Get, "/pessoas")).await;
        assert!(err.is_err());
        let ok = t.send(ApiRequest::new(Method::Get, "/pessoas")).await;
        assert!(ok.is_ok());
        assert_eq!(t.requests().len(), 2);
    }

    #[tokio::test]
    async fn custom_resource_name() {
        let t = MemoryTransport::new().with_resource("/people/");
        assert_eq!(send(&t, Method::Get, "/people", None).await.status, 200);
        assert_eq!(send(&t, Method::Get, "/pessoas", None).await.status, 404);
    }
}
