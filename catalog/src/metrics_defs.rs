use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "http.request.duration",
    metric_type: MetricType::Histogram,
    description: "Request duration in seconds. Tagged with route, status.",
};

pub const UPSTREAM_REQUEST_DURATION: MetricDef = MetricDef {
    name: "upstream.request.duration",
    metric_type: MetricType::Histogram,
    description: "Duration of a single catalog API call in seconds. Tagged with outcome.",
};

pub const UPSTREAM_REQUESTS: MetricDef = MetricDef {
    name: "upstream.requests",
    metric_type: MetricType::Counter,
    description: "Catalog API calls. Tagged with outcome: ok, timeout, status, decode, request.",
};

pub const RESIDENTS_FANOUT_SIZE: MetricDef = MetricDef {
    name: "residents.fanout.size",
    metric_type: MetricType::Histogram,
    description: "Resident records fetched to render one location page",
};

pub const ALL_METRICS: &[MetricDef] = &[
    REQUEST_DURATION,
    UPSTREAM_REQUEST_DURATION,
    UPSTREAM_REQUESTS,
    RESIDENTS_FANOUT_SIZE,
];
