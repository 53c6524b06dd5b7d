//! Paginated, filtered listing of events joined with their places.
//!
//! [`usecase::services::query_service::EventQueryService`] is the entry point:
//! it turns an [`domain::entities::search::EventSearch`] into a backend-neutral
//! condition, counts and fetches through an
//! [`usecase::ports::repo::EventViewStore`], and returns a
//! [`domain::entities::page::PageResult`].

pub mod config;
pub mod error;

pub mod domain {
    pub mod entities {
        pub mod condition;
        pub mod event;
        pub mod page;
        pub mod search;
    }
}

pub mod usecase {
    pub mod ports {
        pub mod repo;
    }

    pub mod services {
        pub mod predicate_builder;
        pub mod query_service;
    }
}

pub mod infra {
    pub mod seed;

    pub mod memory {
        pub mod store;
    }

    pub mod sqlite {
        pub mod queries;
        pub mod repo;
        pub mod schema;
    }
}
