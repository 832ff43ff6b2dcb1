use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use trellis_core::{TrellisError, TrellisResult};
use trellis_domain::{
    Attachment, AttachmentSource, Board, Card, CardUpdate, CheckItem, CheckItemState, Checklist,
    CreateCardParams, CreateCheckItemParams, CreateChecklistParams, CreateListParams,
    DomainClient, FieldUpdate, Label, List, Member,
};

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub token: String,
}

/// [`DomainClient`] backed by the Trello REST API.
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    cards: Vec<Card>,
}

impl TrelloClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);
        self.http.request(method, url).query(&[
            ("key", self.credentials.api_key.as_str()),
            ("token", self.credentials.token.as_str()),
        ])
    }

    async fn send(&self, request: RequestBuilder) -> TrellisResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| TrellisError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Request failed with {}: {}", status, body.trim());
        Err(TrellisError::Remote {
            status: status.as_u16(),
            message: body.trim().to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> TrellisResult<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| TrellisError::Serialization(e.to_string()))
    }

    async fn execute(&self, request: RequestBuilder) -> TrellisResult<()> {
        self.send(request).await.map(|_| ())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> TrellisResult<T> {
        self.fetch(self.request(Method::GET, path)).await
    }
}

fn update_body(update: &CardUpdate) -> Value {
    let mut body = Map::new();
    if let Some(name) = &update.name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(desc) = &update.desc {
        body.insert("desc".to_string(), json!(desc));
    }
    match &update.due {
        FieldUpdate::NoChange => {}
        FieldUpdate::Set(due) => {
            body.insert("due".to_string(), json!(due));
        }
        FieldUpdate::Clear => {
            body.insert("due".to_string(), Value::Null);
        }
    }
    if let Some(list_id) = &update.list_id {
        body.insert("idList".to_string(), json!(list_id));
        body.insert("pos".to_string(), json!("bottom"));
    }
    if let Some(closed) = update.closed {
        body.insert("closed".to_string(), json!(closed));
    }
    Value::Object(body)
}

#[async_trait]
impl DomainClient for TrelloClient {
    async fn list_boards(&self) -> TrellisResult<Vec<Board>> {
        self.fetch(
            self.request(Method::GET, "/members/me/boards")
                .query(&[("filter", "open")]),
        )
        .await
    }

    async fn get_board(&self, board_id: &str) -> TrellisResult<Board> {
        self.get(&format!("/boards/{}", board_id)).await
    }

    async fn list_lists(&self, board_id: &str) -> TrellisResult<Vec<List>> {
        self.fetch(
            self.request(Method::GET, &format!("/boards/{}/lists", board_id))
                .query(&[("filter", "open")]),
        )
        .await
    }

    async fn create_list(&self, params: CreateListParams) -> TrellisResult<List> {
        self.fetch(self.request(Method::POST, "/lists").json(&json!({
            "name": params.name,
            "idBoard": params.board_id,
            "pos": "bottom",
        })))
        .await
    }

    async fn list_cards(&self, list_id: &str) -> TrellisResult<Vec<Card>> {
        self.get(&format!("/lists/{}/cards", list_id)).await
    }

    async fn get_card(&self, card_id: &str) -> TrellisResult<Card> {
        self.get(&format!("/cards/{}", card_id)).await
    }

    async fn create_card(&self, params: CreateCardParams) -> TrellisResult<Card> {
        self.fetch(self.request(Method::POST, "/cards").json(&json!({
            "idList": params.list_id,
            "name": params.name,
            "desc": params.desc.unwrap_or_default(),
            "pos": "bottom",
        })))
        .await
    }

    async fn update_card(&self, card_id: &str, update: CardUpdate) -> TrellisResult<Card> {
        self.fetch(
            self.request(Method::PUT, &format!("/cards/{}", card_id))
                .json(&update_body(&update)),
        )
        .await
    }

    async fn move_card(&self, card_id: &str, list_id: &str) -> TrellisResult<Card> {
        let update = CardUpdate {
            list_id: Some(list_id.to_string()),
            ..CardUpdate::default()
        };
        self.update_card(card_id, update).await
    }

    async fn archive_card(&self, card_id: &str) -> TrellisResult<Card> {
        let update = CardUpdate {
            closed: Some(true),
            ..CardUpdate::default()
        };
        self.update_card(card_id, update).await
    }

    async fn delete_card(&self, card_id: &str) -> TrellisResult<()> {
        self.execute(self.request(Method::DELETE, &format!("/cards/{}", card_id)))
            .await
    }

    async fn my_cards(&self) -> TrellisResult<Vec<Card>> {
        self.fetch(
            self.request(Method::GET, "/members/me/cards")
                .query(&[("filter", "open")]),
        )
        .await
    }

    async fn list_labels(&self, board_id: &str) -> TrellisResult<Vec<Label>> {
        self.get(&format!("/boards/{}/labels", board_id)).await
    }

    async fn add_label(&self, card_id: &str, label_id: &str) -> TrellisResult<()> {
        self.execute(
            self.request(Method::POST, &format!("/cards/{}/idLabels", card_id))
                .json(&json!({ "value": label_id })),
        )
        .await
    }

    async fn remove_label(&self, card_id: &str, label_id: &str) -> TrellisResult<()> {
        self.execute(self.request(
            Method::DELETE,
            &format!("/cards/{}/idLabels/{}", card_id, label_id),
        ))
        .await
    }

    async fn list_members(&self, board_id: &str) -> TrellisResult<Vec<Member>> {
        self.get(&format!("/boards/{}/members", board_id)).await
    }

    async fn add_member(&self, card_id: &str, member_id: &str) -> TrellisResult<()> {
        self.execute(
            self.request(Method::POST, &format!("/cards/{}/idMembers", card_id))
                .json(&json!({ "value": member_id })),
        )
        .await
    }

    async fn remove_member(&self, card_id: &str, member_id: &str) -> TrellisResult<()> {
        self.execute(self.request(
            Method::DELETE,
            &format!("/cards/{}/idMembers/{}", card_id, member_id),
        ))
        .await
    }

    async fn list_checklists(&self, card_id: &str) -> TrellisResult<Vec<Checklist>> {
        self.get(&format!("/cards/{}/checklists", card_id)).await
    }

    async fn create_checklist(&self, params: CreateChecklistParams) -> TrellisResult<Checklist> {
        self.fetch(self.request(Method::POST, "/checklists").json(&json!({
            "idCard": params.card_id,
            "name": params.name,
        })))
        .await
    }

    async fn delete_checklist(&self, checklist_id: &str) -> TrellisResult<()> {
        self.execute(self.request(Method::DELETE, &format!("/checklists/{}", checklist_id)))
            .await
    }

    async fn create_check_item(&self, params: CreateCheckItemParams) -> TrellisResult<CheckItem> {
        self.fetch(
            self.request(
                Method::POST,
                &format!("/checklists/{}/checkItems", params.checklist_id),
            )
            .json(&json!({ "name": params.name })),
        )
        .await
    }

    async fn delete_check_item(
        &self,
        checklist_id: &str,
        check_item_id: &str,
    ) -> TrellisResult<()> {
        self.execute(self.request(
            Method::DELETE,
            &format!("/checklists/{}/checkItems/{}", checklist_id, check_item_id),
        ))
        .await
    }

    async fn set_check_item_state(
        &self,
        card_id: &str,
        check_item_id: &str,
        state: CheckItemState,
    ) -> TrellisResult<CheckItem> {
        self.fetch(
            self.request(
                Method::PUT,
                &format!("/cards/{}/checkItem/{}", card_id, check_item_id),
            )
            .json(&json!({ "state": state.as_str() })),
        )
        .await
    }

    async fn list_attachments(&self, card_id: &str) -> TrellisResult<Vec<Attachment>> {
        self.get(&format!("/cards/{}/attachments", card_id)).await
    }

    async fn add_attachment(
        &self,
        card_id: &str,
        source: AttachmentSource,
    ) -> TrellisResult<Attachment> {
        let path = format!("/cards/{}/attachments", card_id);
        let request = match source {
            AttachmentSource::Url { url, name } => {
                let mut body = json!({ "url": url });
                if let Some(name) = name {
                    body["name"] = json!(name);
                }
                self.request(Method::POST, &path).json(&body)
            }
            AttachmentSource::File(file) => {
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .ok_or_else(|| {
                        TrellisError::Validation(format!("not a file: {}", file.display()))
                    })?;
                let bytes = tokio::fs::read(&file).await?;
                let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.clone());
                let form = reqwest::multipart::Form::new()
                    .text("name", file_name)
                    .part("file", part);
                self.request(Method::POST, &path).multipart(form)
            }
        };
        self.fetch(request).await
    }

    async fn delete_attachment(
        &self,
        card_id: &str,
        attachment_id: &str,
    ) -> TrellisResult<()> {
        self.execute(self.request(
            Method::DELETE,
            &format!("/cards/{}/attachments/{}", card_id, attachment_id),
        ))
        .await
    }

    async fn search_cards(&self, query: &str) -> TrellisResult<Vec<Card>> {
        let response: SearchResponse = self
            .fetch(self.request(Method::GET, "/search").query(&[
                ("query", query),
                ("modelTypes", "cards"),
                ("cards_limit", "50"),
            ]))
            .await?;
        Ok(response.cards)
    }
}
