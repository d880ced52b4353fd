//! End-to-end configuration build tests.

use std::sync::Arc;

use gateway_routes::config::validation::ValidationError;
use gateway_routes::config::{
    ConfigBuilder, ConfigError, ConfigHolder, FileGlobalConfiguration, FileSource, StaticSource,
};
use gateway_routes::routing::options::LoadBalancerKind;
use gateway_routes::{derive_route_key, FileConfiguration};

mod common;

use common::{config, rate_limited_global, route};

#[test]
fn test_two_routes_inherit_global_rate_limit() {
    let mut global = FileGlobalConfiguration::default();
    global.rate_limit.enabled = Some(true);
    let input = config(
        vec![route("/users/{id}", &["GET"]), route("/orders", &["POST", "GET"])],
        global,
    );

    let runtime = ConfigBuilder::default().create_from(&input).unwrap();
    let routes = runtime.routes();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].route_key().as_str(), "/users/{id}|GET");
    assert_eq!(routes[1].route_key().as_str(), "/orders|POST,GET");
    assert!(routes.iter().all(|r| r.enable_rate_limiting()));
    assert!(routes.iter().all(|r| r.rate_limit().is_some()));
    assert_eq!(routes[0].upstream_path_template(), "/users/{id}");
    assert_eq!(routes[1].upstream_path_template(), "/orders");
}

#[test]
fn test_global_quota_reaches_inheriting_routes() {
    let input = config(vec![route("/orders", &["POST", "GET"])], rate_limited_global());

    let runtime = ConfigBuilder::default().create_from(&input).unwrap();
    let rule = runtime.routes()[0].rate_limit().unwrap().rule.as_ref().unwrap();
    assert_eq!(rule.limit, 100);
    assert_eq!(rule.period, "1m");
}

#[test]
fn test_repeated_builds_are_equal() {
    let mut cached = route("/catalog/{sku}", &["GET"]);
    cached.cache.ttl_seconds = 30;
    cached.load_balancer = Some("RoundRobin".into());
    cached.add_headers_to_request.insert("CustomerId".into(), "Claims[sub] > value".into());
    let input = config(vec![cached, route("/orders", &["POST"])], rate_limited_global());

    let builder = ConfigBuilder::new(StaticSource::new(input));
    let first = builder.create().unwrap();
    let second = builder.create().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.routes()[0].load_balancer(), LoadBalancerKind::RoundRobin);
    assert_eq!(first.routes()[0].claims_to_headers()[0].claim_key, "sub");
}

#[test]
fn test_route_order_preserved() {
    let upstreams = ["/z", "/a", "/m/{id}", "/b", "/y"];
    let input = config(
        upstreams.iter().map(|u| route(u, &["GET"])).collect(),
        Default::default(),
    );

    let runtime = ConfigBuilder::default().create_from(&input).unwrap();
    let resolved: Vec<_> = runtime.routes().iter().map(|r| r.upstream_path_template()).collect();
    assert_eq!(resolved, upstreams);
}

#[test]
fn test_rate_limit_cascade() {
    let inherits = route("/inherit", &["GET"]);
    let mut opts_out = route("/opt-out", &["GET"]);
    opts_out.rate_limit.enabled = Some(false);
    let mut opts_in = route("/opt-in", &["GET"]);
    opts_in.rate_limit.enabled = Some(true);
    opts_in.rate_limit.period = Some("1s".into());
    opts_in.rate_limit.limit = Some(5);

    let routes = vec![inherits, opts_out, opts_in];

    let enabled = ConfigBuilder::default()
        .create_from(&config(routes.clone(), rate_limited_global()))
        .unwrap();
    let flags: Vec<_> = enabled.routes().iter().map(|r| r.enable_rate_limiting()).collect();
    assert_eq!(flags, vec![true, false, true]);
    assert_eq!(enabled.routes()[2].rate_limit().unwrap().rule.as_ref().unwrap().limit, 5);

    let disabled = ConfigBuilder::default()
        .create_from(&config(routes, Default::default()))
        .unwrap();
    let flags: Vec<_> = disabled.routes().iter().map(|r| r.enable_rate_limiting()).collect();
    assert_eq!(flags, vec![false, false, true]);
}

#[test]
fn test_one_invalid_route_rejects_everything() {
    let mut bad_method = route("/orders", &["FETCH ME"]);
    bad_method.downstream_host = None;
    let input = config(
        vec![route("/users/{id}", &["GET"]), bad_method, route("no-slash", &["GET"])],
        Default::default(),
    );

    let err = ConfigBuilder::default().create_from(&input).unwrap_err();
    let report = err.validation_report().expect("validation failure");

    let routes_hit: Vec<_> = report
        .errors()
        .iter()
        .filter_map(|e| match e {
            ValidationError::Route { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(routes_hit, vec![1, 1, 2, 2]);

    let rendered = err.to_string();
    assert!(rendered.starts_with("Unable to start gateway, configuration errors were:"));
    assert_eq!(rendered.lines().count(), 1 + report.len());
}

#[test]
fn test_duplicate_route_key_rejected() {
    let mut other_backend = route("/orders", &["GET"]);
    other_backend.downstream_host = Some("orders-v2.internal".into());
    let input = config(
        vec![route("/orders", &["GET"]), route("/orders", &["GET"]), other_backend],
        Default::default(),
    );

    let report = ConfigBuilder::default()
        .create_from(&input)
        .unwrap_err()
        .validation_report()
        .cloned()
        .unwrap();

    let key = derive_route_key("/orders", &["GET"]);
    assert!(report.errors().contains(&ValidationError::DuplicateRouteKey {
        first: 0,
        second: 1,
        key: key.clone(),
    }));
    assert!(report.errors().contains(&ValidationError::ConflictingRouteKey {
        first: 0,
        second: 2,
        key,
    }));
}

#[test]
fn test_concurrent_builds_of_different_inputs() {
    let builder = ConfigBuilder::default();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let builder = &builder;
                scope.spawn(move || {
                    let routes = (0..=n).map(|i| route(&format!("/svc{}/{{id}}", i), &["GET"])).collect();
                    builder.create_from(&config(routes, Default::default())).unwrap()
                })
            })
            .collect();

        for (n, handle) in handles.into_iter().enumerate() {
            let runtime = handle.join().unwrap();
            assert_eq!(runtime.routes().len(), n + 1);
        }
    });
}

#[test]
fn test_concurrent_builds_of_same_input_are_equal() {
    let input = config(
        vec![route("/users/{id}", &["GET"]), route("/orders", &["POST", "GET"])],
        rate_limited_global(),
    );
    let builder = ConfigBuilder::new(StaticSource::new(input));
    let reference = builder.create().unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| builder.create().unwrap())).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), reference);
        }
    });
}

#[test]
fn test_file_source_toml() {
    let path = common::temp_config(
        "file_source.toml",
        r#"
[global]
request_id_key = "X-Request-Id"
administration_path = "/administration"

[global.rate_limit]
enabled = true
period = "1m"
limit = 100

[global.service_discovery]
provider = "Consul"
host = "consul.internal"
port = 8501

[[routes]]
downstream_path_template = "/api/users/{id}"
upstream_path_template = "/users/{id}"
upstream_http_methods = ["GET"]
downstream_host = "users.internal"
downstream_port = 8080

[[routes]]
downstream_path_template = "/api/orders"
upstream_path_template = "/orders"
upstream_http_methods = ["POST", "GET"]
service_name = "orders"
use_service_discovery = true
"#,
    );

    let result = ConfigBuilder::new(FileSource::new(&path)).create();
    std::fs::remove_file(&path).ok();
    let runtime = result.unwrap();

    assert_eq!(runtime.administration_path(), Some("/administration"));
    assert_eq!(runtime.service_provider().provider, "consul");
    assert_eq!(runtime.service_provider().port, 8501);

    let users = runtime.find_route("/USERS/42", "get").unwrap();
    assert_eq!(users.params[0].name, "id");
    assert_eq!(users.params[0].value, "42");
    assert_eq!(users.route.request_id_key(), Some("X-Request-Id"));
    assert_eq!(users.route.downstream_host(), Some("users.internal"));

    let orders = runtime.find_route("/orders", "POST").unwrap();
    assert!(orders.route.use_service_discovery());
    assert!(orders.route.enable_rate_limiting());
    assert!(runtime.find_route("/orders", "DELETE").is_none());
}

#[test]
fn test_unreadable_source_is_not_a_validation_error() {
    let err = ConfigBuilder::new(FileSource::new("/definitely/not/here.json"))
        .create()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.validation_report().is_none());
}

#[test]
fn test_holder_keeps_last_good_snapshot() {
    let builder = ConfigBuilder::default();
    let good = builder
        .create_from(&config(vec![route("/a", &["GET"])], Default::default()))
        .unwrap();
    let holder = Arc::new(ConfigHolder::new(good));
    let published = holder.current();

    let bad = config(vec![route("/b", &["NOT A METHOD"])], Default::default());
    if let Ok(next) = builder.create_from(&bad) {
        holder.publish(next);
    }
    assert!(Arc::ptr_eq(&published, &holder.current()));

    let next = builder
        .create_from(&config(vec![route("/b", &["GET"])], Default::default()))
        .unwrap();
    holder.publish(next);
    assert_eq!(holder.current().routes()[0].upstream_path_template(), "/b");
}

#[test]
fn test_empty_configuration_builds() {
    let runtime = ConfigBuilder::default()
        .create_from(&FileConfiguration::default())
        .unwrap();
    assert!(runtime.routes().is_empty());
    assert_eq!(runtime.administration_path(), None);
    assert_eq!(runtime.service_provider().host, "localhost");
}
