use crate::{
    compute::{FaultInjectionPolicy, PathMatcherRules, RouteAction, UrlMap},
    error::{NotFoundTarget, Result},
    logger,
};

/// Returns the fault injection policy attached to `path` in the path matcher
/// named `matcher_name`, creating the route action and the policy when absent.
///
/// Legacy path rules match when their path list contains `path` verbatim. Route
/// rules match on prefix, full path or regex. The first matching rule in the
/// order of the url map wins.
pub fn find_or_create_fault_injection_policy<'a>(
    url_map: &'a mut UrlMap,
    matcher_name: &str,
    path: &str,
) -> Result<&'a mut FaultInjectionPolicy> {
    let route_action = locate_route_action(url_map, matcher_name, path)?;

    let policy = route_action
        .get_or_insert_with(RouteAction::default)
        .fault_injection_policy
        .get_or_insert_with(FaultInjectionPolicy::default);

    Ok(policy)
}

/// Detaches the fault injection policy attached to `path`. Returns whether a
/// policy was detached. A missing path matcher or path is not an error.
pub fn remove_fault_injection_policy(url_map: &mut UrlMap, matcher_name: &str, path: &str) -> bool {
    match locate_route_action(url_map, matcher_name, path) {
        Ok(route_action) => route_action
            .as_mut()
            .and_then(|action| action.fault_injection_policy.take())
            .is_some(),
        Err(target) => {
            logger!(warn, "nothing to remove: {}", target);
            false
        }
    }
}

fn locate_route_action<'a>(
    url_map: &'a mut UrlMap,
    matcher_name: &str,
    path: &str,
) -> Result<&'a mut Option<RouteAction>, NotFoundTarget> {
    let matcher = url_map
        .path_matcher_mut(matcher_name)
        .ok_or_else(|| NotFoundTarget::PathMatcher(matcher_name.to_string()))?;

    let route_action = match &mut matcher.rules {
        PathMatcherRules::PathRules(rules) => rules
            .iter_mut()
            .find(|rule| rule.contains_path(path))
            .map(|rule| &mut rule.route_action),
        PathMatcherRules::RouteRules(rules) => rules
            .iter_mut()
            .find(|rule| rule.matches(path))
            .map(|rule| &mut rule.route_action),
        PathMatcherRules::None => None,
    };

    route_action.ok_or_else(|| NotFoundTarget::TargetPath(path.to_string()))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::{
        compute::{Duration, FaultAbort, FaultDelay},
        error::Error,
    };

    use super::*;

    fn url_map() -> UrlMap {
        serde_yaml::from_str(indoc! {
            r#"
            name: demo-urlmap
            fingerprint: 6Mt2Fm6pUk4=
            hostRules:
            - hosts:
              - "*"
              pathMatcher: allpaths
            pathMatchers:
            - name: allpaths
              pathRules:
              - paths:
                - /static
                - /static/*
                service: static
              - paths:
                - /*
                service: web
            - name: routes
              routeRules:
              - priority: 1
                matchRules:
                - prefixMatch: /api
                service: api
              - priority: 2
                matchRules:
                - fullPathMatch: /api/health
                service: health
              - priority: 3
                matchRules:
                - regexMatch: /v[0-9]+/users/.*
                service: users
                routeAction:
                  faultInjectionPolicy:
                    abort:
                      httpStatus: 503
                      percentage: 20.0
            - name: empty
              defaultService: web
            "#
        })
        .unwrap()
    }

    fn path_rule_policy<'a>(
        url_map: &'a UrlMap,
        matcher: &str,
        index: usize,
    ) -> Option<&'a FaultInjectionPolicy> {
        match &url_map.path_matcher(matcher)?.rules {
            PathMatcherRules::PathRules(rules) => rules[index]
                .route_action
                .as_ref()?
                .fault_injection_policy
                .as_ref(),
            _ => None,
        }
    }

    fn route_rule_policy<'a>(
        url_map: &'a UrlMap,
        matcher: &str,
        index: usize,
    ) -> Option<&'a FaultInjectionPolicy> {
        match &url_map.path_matcher(matcher)?.rules {
            PathMatcherRules::RouteRules(rules) => rules[index]
                .route_action
                .as_ref()?
                .fault_injection_policy
                .as_ref(),
            _ => None,
        }
    }

    mod find_or_create {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn path_ruleのpolicyをその場で作成して返す() {
            let mut url_map = url_map();

            let policy = find_or_create_fault_injection_policy(&mut url_map, "allpaths", "/*")
                .unwrap();

            assert_eq!(policy, &mut FaultInjectionPolicy::default());

            policy.delay = Some(FaultDelay {
                percentage: 75.0,
                fixed_delay: Duration {
                    seconds: 3,
                    nanos: 0,
                },
            });

            assert_eq!(
                path_rule_policy(&url_map, "allpaths", 1),
                Some(&FaultInjectionPolicy {
                    delay: Some(FaultDelay {
                        percentage: 75.0,
                        fixed_delay: Duration {
                            seconds: 3,
                            nanos: 0
                        },
                    }),
                    abort: None,
                })
            );
            assert_eq!(path_rule_policy(&url_map, "allpaths", 0), None);
        }

        #[test]
        fn path_ruleは完全一致のみで判定する() {
            let mut url_map = url_map();

            let actual = find_or_create_fault_injection_policy(&mut url_map, "allpaths", "/static/js");

            assert!(matches!(
                actual,
                Err(Error::NotFound(NotFoundTarget::TargetPath(path))) if path == "/static/js"
            ));
        }

        #[test]
        fn prefix_matchに一致するroute_ruleを返す() {
            let mut url_map = url_map();

            find_or_create_fault_injection_policy(&mut url_map, "routes", "/api/v1/x")
                .unwrap()
                .abort = Some(FaultAbort {
                percentage: 50.0,
                http_status: 500,
            });

            assert_eq!(
                route_rule_policy(&url_map, "routes", 0).and_then(|p| p.abort.clone()),
                Some(FaultAbort {
                    percentage: 50.0,
                    http_status: 500,
                })
            );
        }

        #[test]
        fn 先に定義されたroute_ruleが優先される() {
            let mut url_map = url_map();

            find_or_create_fault_injection_policy(&mut url_map, "routes", "/api/health").unwrap();

            assert!(route_rule_policy(&url_map, "routes", 0).is_some());
            assert!(route_rule_policy(&url_map, "routes", 1).is_none());
        }

        #[test]
        fn regex_matchに一致するroute_ruleの既存policyを返す() {
            let mut url_map = url_map();

            let policy =
                find_or_create_fault_injection_policy(&mut url_map, "routes", "/v2/users/42")
                    .unwrap();

            assert_eq!(
                policy.abort,
                Some(FaultAbort {
                    percentage: 20.0,
                    http_status: 503,
                })
            );
        }

        #[test]
        fn どのroute_ruleにも一致しなければnot_foundを返す() {
            let mut url_map = url_map();
            let before = url_map.clone();

            let actual = find_or_create_fault_injection_policy(&mut url_map, "routes", "/other");

            assert!(matches!(
                actual,
                Err(Error::NotFound(NotFoundTarget::TargetPath(_)))
            ));
            assert_eq!(url_map, before);
        }

        #[test]
        fn path_matcherがなければnot_foundを返す() {
            let mut url_map = url_map();

            let actual = find_or_create_fault_injection_policy(&mut url_map, "missing", "/*");

            assert!(matches!(
                actual,
                Err(Error::NotFound(NotFoundTarget::PathMatcher(name))) if name == "missing"
            ));
        }

        #[test]
        fn ルールを持たないpath_matcherはnot_foundを返す() {
            let mut url_map = url_map();

            let actual = find_or_create_fault_injection_policy(&mut url_map, "empty", "/*");

            assert!(matches!(
                actual,
                Err(Error::NotFound(NotFoundTarget::TargetPath(_)))
            ));
        }

        #[test]
        fn policyのないroute_actionには空のpolicyを追加する() {
            let mut url_map: UrlMap = serde_yaml::from_str(indoc! {
                "
                pathMatchers:
                - name: allpaths
                  pathRules:
                  - paths:
                    - /*
                    routeAction:
                      timeout:
                        seconds: '30'
                "
            })
            .unwrap();

            find_or_create_fault_injection_policy(&mut url_map, "allpaths", "/*").unwrap();

            let actual = serde_json::to_value(&url_map).unwrap();

            assert_eq!(
                actual["pathMatchers"][0]["pathRules"][0]["routeAction"],
                serde_json::json!({
                    "timeout": {"seconds": "30"},
                    "faultInjectionPolicy": {}
                })
            );
        }
    }

    mod remove {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn route_ruleのpolicyを取り除く() {
            let mut url_map = url_map();

            let removed = remove_fault_injection_policy(&mut url_map, "routes", "/v1/users/1");

            assert!(removed);
            assert_eq!(route_rule_policy(&url_map, "routes", 2), None);
        }

        #[test]
        fn 二回実行しても同じ結果になる() {
            let mut url_map = url_map();

            find_or_create_fault_injection_policy(&mut url_map, "allpaths", "/*").unwrap();

            assert!(remove_fault_injection_policy(&mut url_map, "allpaths", "/*"));
            let once = url_map.clone();

            assert!(!remove_fault_injection_policy(&mut url_map, "allpaths", "/*"));
            assert_eq!(url_map, once);
        }

        #[test]
        fn 対象がなければ何もしない() {
            let mut url_map = url_map();
            let before = url_map.clone();

            assert!(!remove_fault_injection_policy(&mut url_map, "missing", "/*"));
            assert!(!remove_fault_injection_policy(&mut url_map, "routes", "/other"));
            assert!(!remove_fault_injection_policy(&mut url_map, "empty", "/*"));
            assert_eq!(url_map, before);
        }
    }
}
