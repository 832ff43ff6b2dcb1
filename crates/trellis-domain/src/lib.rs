pub mod attachment;
pub mod board;
pub mod cache;
pub mod card;
pub mod checklist;
pub mod client;
pub mod due;
pub mod field_update;
pub mod label;
pub mod list;
pub mod member;
pub mod memory;

pub use attachment::{Attachment, AttachmentId};
pub use board::{Board, BoardId};
pub use cache::{Cache, MemoryCache, SyncReport};
pub use card::{Card, CardId};
pub use checklist::{CheckItem, CheckItemId, CheckItemState, Checklist, ChecklistId};
pub use client::{
    AttachmentSource, CardUpdate, CreateCardParams, CreateCheckItemParams, CreateChecklistParams,
    CreateListParams, DomainClient,
};
pub use due::{format_due, parse_due, DueInput};
pub use field_update::FieldUpdate;
pub use label::{Label, LabelId};
pub use list::{List, ListId};
pub use member::{Member, MemberId};
pub use memory::MemoryClient;
