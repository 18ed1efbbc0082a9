//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent actor systems. The crate implements a
//! **Resource-Oriented Architecture (ROA)** on top of the **Actor Model**: every
//! entity type gets one actor that owns all instances of it, and callers talk to
//! that actor through a cloneable, strongly-typed client.
//!
//! ### Resource-Oriented Architecture
//!
//! - Standard operations (Create, Get, List, Update, Delete) on well-defined resources
//! - Domain-specific **Actions** for everything that is not plain CRUD
//! - A uniform API surface across all resource types
//!
//! ### Actor Model
//!
//! - Isolated state (no shared memory, no locks)
//! - Message-passing concurrency
//! - Sequential processing within each actor, so every entity has a single writer
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain model and its rules
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing, ID allocation, rollback
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe communication
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Printer {
//!     id: u32,
//!     name: String,
//!     jobs: u32,
//! }
//!
//! #[derive(Debug)] struct PrinterCreate { name: String }
//! #[derive(Debug)] struct PrinterUpdate { name: Option<String> }
//! #[derive(Debug)] enum PrinterAction { Print }
//! #[derive(Debug, thiserror::Error)] #[error("printer error")] struct PrinterError;
//!
//! #[async_trait]
//! impl ActorEntity for Printer {
//!     type Id = u32;
//!     type Create = PrinterCreate;
//!     type Update = PrinterUpdate;
//!     type Action = PrinterAction;
//!     type ActionResult = u32;
//!     type Context = ();
//!     type Error = PrinterError;
//!
//!     fn from_create_params(id: u32, params: PrinterCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, name: params.name, jobs: 0 })
//!     }
//!
//!     async fn on_update(&mut self, update: PrinterUpdate, _ctx: &()) -> Result<(), Self::Error> {
//!         if let Some(name) = update.name { self.name = name; }
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: PrinterAction, _ctx: &()) -> Result<u32, Self::Error> {
//!         match action {
//!             PrinterAction::Print => { self.jobs += 1; Ok(self.jobs) }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Printer>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(PrinterCreate { name: "grill".into() }).await.unwrap();
//!     assert_eq!(client.perform_action(id, PrinterAction::Print).await.unwrap(), 1);
//!     assert_eq!(client.list().await.unwrap().len(), 1);
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected when the actor is started (`run(context)`), not when it is
//! constructed. All actors and clients can therefore be created first and wired afterwards,
//! which is how the application's system builder resolves actors that depend on each other.
//!
//! Cross-actor calls must form an acyclic graph: an actor that awaits a call to another
//! actor is blocked until that call returns, so a cycle would deadlock both.
//!
//! ## Testing
//!
//! The [`mock`] module provides `MockClient`, a `ResourceClient<T>` answered from queued
//! expectations instead of a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod id;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};

#[doc(hidden)]
pub use paste;
