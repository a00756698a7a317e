pub(crate) const SCHEMA: &str = "
pragma foreign_keys = on;

create table if not exists comments_raw (
    id text primary key,
    created_utc integer not null,
    response text not null
);
create index if not exists comments_raw_created_utc on comments_raw (created_utc);

create table if not exists ner_models (
    id text primary key,
    model text not null,
    description text,
    created_at text not null
);

create table if not exists ner_results (
    id integer primary key,
    comment_id text not null references comments_raw (id),
    ner_model_id text not null references ner_models (id),
    label text not null,
    text text not null,
    start_char integer not null,
    end_char integer not null,
    unique (comment_id, ner_model_id, start_char, end_char)
);
create index if not exists ner_results_text on ner_results (text);

create table if not exists ner_scans (
    comment_id text not null references comments_raw (id),
    ner_model_id text not null references ner_models (id),
    primary key (comment_id, ner_model_id)
);

create table if not exists locations_raw (
    id text primary key,
    response text not null
);

create table if not exists geocode (
    location_text text not null,
    location_id text not null references locations_raw (id),
    primary key (location_text, location_id)
);

create table if not exists cities (
    id text primary key references locations_raw (id),
    city text not null,
    country_name text,
    lat real,
    lng real,
    mentions integer not null,
    wiki_summary text,
    wiki_link text
);
";
