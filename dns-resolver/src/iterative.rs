//! The iterative resolution engine (C6): drives the walk down the
//! DNS hierarchy, classifying each reply as a direct answer, an
//! alias, a referral, or a negative/empty result, per `spec.md`
//! section 4.6.

use std::net::Ipv4Addr;

use dns_types::protocol::{build_query, parse_response, RecordType};

use crate::error::ResolutionError;
use crate::id::IdGenerator;
use crate::transport::Transport;

/// Soft cap on the number of resolution steps (query + classify) a
/// single top-level `resolve` call may take, including nested
/// nameserver-address lookups. Bounds an otherwise-unbounded referral
/// walk (`spec.md` section 4.6 and section 9).
const STEP_BUDGET: u32 = 30;

/// Everything the engine needs that isn't part of the wire protocol
/// itself: how to send a query, how to mint transaction ids, where
/// the root is, and how to tell whether a hostname has a valid TLD.
/// All four are external collaborators per `spec.md` section 6.
pub struct Resolver<'a> {
    pub transport: &'a dyn Transport,
    pub ids: &'a mut dyn IdGenerator,
    pub root_servers: Vec<Ipv4Addr>,
    pub effective_tld: &'a dyn Fn(&str) -> Option<String>,
}

impl<'a> Resolver<'a> {
    /// Resolve `hostname` to an `A` address or an `MX` exchange name,
    /// starting from `servers` (normally the root hints).
    ///
    /// Returns `None` whenever `spec.md` section 7's error table
    /// says so; every cause is logged at the point of failure.
    pub fn resolve(&mut self, hostname: &str, servers: &[Ipv4Addr], want_mx: bool) -> Option<String> {
        let want_type = if want_mx { RecordType::Mx } else { RecordType::A };
        let mut budget = STEP_BUDGET;
        self.resolve_step(hostname, servers, want_type, &mut budget)
    }

    fn step_query(
        &mut self,
        target: &str,
        servers: &[Ipv4Addr],
        want_type: RecordType,
    ) -> Result<dns_types::protocol::ParsedResponse, ResolutionError> {
        let id = self.ids.next_id();
        let query = build_query(id, target, want_type).map_err(|error| {
            tracing::warn!(?error, %target, "could not build query");
            ResolutionError::MalformedResponse
        })?;

        let reply = self
            .transport
            .send_and_receive(&query, servers)
            .ok_or(ResolutionError::AllServersTimedOut)?;

        parse_response(&reply, id).ok_or(ResolutionError::IdMismatch)
    }

    /// Log why resolution stopped for `target` and collapse it to the
    /// single `None` the core ever returns (`spec.md` section 7).
    fn fail(target: &str, error: ResolutionError) -> Option<String> {
        tracing::debug!(%target, %error, "resolution step failed");
        None
    }

    /// One step of the walk: query `servers` for `target`/`want_type`,
    /// classify the reply, and either return an answer or continue
    /// the walk with a new `(target, servers)` pair. Loops in place
    /// for every continuation except the nested "resolve this NS name
    /// to an address" lookup, which recurses with the same shared
    /// `budget` (so total recursion depth is bounded by `STEP_BUDGET`).
    fn resolve_step(
        &mut self,
        target: &str,
        servers: &[Ipv4Addr],
        want_type: RecordType,
        budget: &mut u32,
    ) -> Option<String> {
        let mut target = target.to_string();
        let mut servers = servers.to_vec();

        loop {
            if *budget == 0 {
                return Self::fail(&target, ResolutionError::StepBudgetExceeded);
            }
            *budget -= 1;

            let response = match self.step_query(&target, &servers, want_type) {
                Ok(response) => response,
                Err(error) => return Self::fail(&target, error),
            };

            // Step 1: TLD validity.
            if (self.effective_tld)(&target).is_none() {
                return Self::fail(&target, ResolutionError::InvalidHostname);
            }

            // Step 2: alias rewrite.
            let alias = response
                .answers
                .iter()
                .find(|record| record.name == target && record.rtype == RecordType::Cname)
                .map(dns_types::protocol::Record::value_string);
            let followed_alias = alias.is_some();
            if let Some(cname) = alias {
                target = cname;
            }

            // Step 3: direct answer.
            if let Some(record) = response.get_answer(&target, want_type) {
                return Some(record.value_string());
            }

            // Step 4: empty response.
            if response.answers.is_empty() && response.authorities.is_empty() {
                return Self::fail(&target, ResolutionError::EmptyResponse);
            }

            // Step 5: negative existence.
            if response.answers.is_empty()
                && response
                    .authorities
                    .iter()
                    .any(|record| record.rtype == RecordType::Soa)
            {
                return Self::fail(&target, ResolutionError::NameDoesNotExist);
            }

            // Step 6: alias continuation, restarting from the root.
            if followed_alias {
                servers = self.root_servers.clone();
                continue;
            }

            // Step 7: referral. NS owner-names in authority order.
            let ns_names: Vec<String> = response
                .authorities
                .iter()
                .filter(|record| record.rtype == RecordType::Ns)
                .map(dns_types::protocol::Record::value_string)
                .collect();

            let glue = glue_addresses(&response, &ns_names);
            if !glue.is_empty() {
                servers = glue;
                continue;
            }

            let resolved = ns_names
                .iter()
                .find_map(|ns| self.resolve_step(ns, &self.root_servers.clone(), RecordType::A, budget));

            if let Some(addr) = resolved.and_then(|addr| addr.parse::<Ipv4Addr>().ok()) {
                servers = vec![addr];
                continue;
            }

            servers = self.root_servers.clone();
        }
    }
}

/// Collect the address of the first `A` record in `additional` whose
/// owner matches each NS name, in NS order, skipping NS names with no
/// glue (`spec.md` section 4.6 step 7).
fn glue_addresses(response: &dns_types::protocol::ParsedResponse, ns_names: &[String]) -> Vec<Ipv4Addr> {
    let mut glue = Vec::new();
    for ns in ns_names {
        let address = response
            .additional
            .iter()
            .find(|record| &record.name == ns && record.rtype == RecordType::A)
            .and_then(|record| record.value_string().parse::<Ipv4Addr>().ok());
        if let Some(address) = address {
            glue.push(address);
        }
    }
    glue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FixedId;
    use crate::transport::test_util::{Scripted, ScriptedTransport};
    use dns_types::protocol::name::encode_name;

    fn push_record(message: &mut Vec<u8>, name: &str, rtype: u16, rdata: &[u8]) {
        message.extend_from_slice(&encode_name(name).unwrap());
        message.extend_from_slice(&rtype.to_be_bytes());
        message.extend_from_slice(&1u16.to_be_bytes());
        message.extend_from_slice(&300u32.to_be_bytes());
        message.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        message.extend_from_slice(rdata);
    }

    fn response_header(id: u16, ancount: u16, nscount: u16, arcount: u16) -> Vec<u8> {
        let mut message = Vec::new();
        message.extend_from_slice(&id.to_be_bytes());
        message.extend_from_slice(&0x8180u16.to_be_bytes());
        message.extend_from_slice(&1u16.to_be_bytes());
        message.extend_from_slice(&ancount.to_be_bytes());
        message.extend_from_slice(&nscount.to_be_bytes());
        message.extend_from_slice(&arcount.to_be_bytes());
        message
    }

    fn always_has_tld(hostname: &str) -> Option<String> {
        let _ = hostname;
        Some("com".to_string())
    }

    #[test]
    fn direct_a_answer_is_returned() {
        let mut message = response_header(731, 1, 0, 0);
        message.extend_from_slice(&encode_name("www.whateva.org").unwrap());
        message.extend_from_slice(&1u16.to_be_bytes());
        message.extend_from_slice(&1u16.to_be_bytes());
        push_record(&mut message, "www.whateva.org", 1, &[4, 5, 6, 7]);

        let transport = ScriptedTransport::new(vec![Scripted::Reply(message)]);
        let mut ids = FixedId(731);
        let mut resolver = Resolver {
            transport: &transport,
            ids: &mut ids,
            root_servers: vec![Ipv4Addr::new(7, 7, 7, 7)],
            effective_tld: &always_has_tld,
        };

        let answer = resolver.resolve("www.whateva.org", &[Ipv4Addr::new(7, 7, 7, 7), Ipv4Addr::new(8, 8, 8, 8)], false);
        assert_eq!(answer, Some("4.5.6.7".to_string()));
    }

    #[test]
    fn direct_mx_answer_is_returned() {
        let mut message = response_header(731, 1, 0, 0);
        message.extend_from_slice(&encode_name("www.whateva.org").unwrap());
        message.extend_from_slice(&15u16.to_be_bytes());
        message.extend_from_slice(&1u16.to_be_bytes());
        let mut rdata = 10u16.to_be_bytes().to_vec();
        rdata.extend_from_slice(&encode_name("coolmail.whateva.org").unwrap());
        push_record(&mut message, "www.whateva.org", 15, &rdata);

        let transport = ScriptedTransport::new(vec![Scripted::Reply(message)]);
        let mut ids = FixedId(731);
        let mut resolver = Resolver {
            transport: &transport,
            ids: &mut ids,
            root_servers: vec![Ipv4Addr::new(7, 7, 7, 7)],
            effective_tld: &always_has_tld,
        };

        let answer = resolver.resolve("www.whateva.org", &[Ipv4Addr::new(7, 7, 7, 7)], true);
        assert_eq!(answer, Some("coolmail.whateva.org".to_string()));
    }

    #[test]
    fn transport_exhaustion_returns_none() {
        let transport = ScriptedTransport::new(vec![Scripted::Timeout, Scripted::Timeout]);
        let mut ids = FixedId(1);
        let mut resolver = Resolver {
            transport: &transport,
            ids: &mut ids,
            root_servers: vec![Ipv4Addr::new(1, 1, 1, 1)],
            effective_tld: &always_has_tld,
        };

        let answer = resolver.resolve("example.com", &[Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(2, 2, 2, 2)], false);
        assert_eq!(answer, None);
    }

    #[test]
    fn invalid_tld_returns_none_without_consulting_the_response() {
        let mut message = response_header(1, 0, 0, 0);
        message.extend_from_slice(&encode_name("localhost").unwrap());
        message.extend_from_slice(&1u16.to_be_bytes());
        message.extend_from_slice(&1u16.to_be_bytes());
        let transport = ScriptedTransport::new(vec![Scripted::Reply(message)]);
        let mut ids = FixedId(1);
        let mut resolver = Resolver {
            transport: &transport,
            ids: &mut ids,
            root_servers: vec![Ipv4Addr::new(1, 1, 1, 1)],
            effective_tld: &|_: &str| None,
        };

        assert_eq!(resolver.resolve("localhost", &[Ipv4Addr::new(1, 1, 1, 1)], false), None);
    }

    #[test]
    fn negative_existence_via_soa_returns_none() {
        let mut message = response_header(1, 0, 1, 0);
        message.extend_from_slice(&encode_name("nope.example.com").unwrap());
        message.extend_from_slice(&1u16.to_be_bytes());
        message.extend_from_slice(&1u16.to_be_bytes());
        let mut soa_rdata = encode_name("master.example.com").unwrap();
        soa_rdata.extend_from_slice(&encode_name("hostmaster.example.com").unwrap());
        soa_rdata.extend_from_slice(&[0; 20]);
        push_record(&mut message, "example.com", 6, &soa_rdata);

        let transport = ScriptedTransport::new(vec![Scripted::Reply(message)]);
        let mut ids = FixedId(1);
        let mut resolver = Resolver {
            transport: &transport,
            ids: &mut ids,
            root_servers: vec![Ipv4Addr::new(1, 1, 1, 1)],
            effective_tld: &always_has_tld,
        };

        assert_eq!(resolver.resolve("nope.example.com", &[Ipv4Addr::new(1, 1, 1, 1)], false), None);
    }

    #[test]
    fn glue_record_lets_referral_continue_without_a_new_ns_lookup() {
        // First reply: referral with NS + glue A record.
        let mut referral = response_header(1, 0, 1, 1);
        referral.extend_from_slice(&encode_name("www.example.com").unwrap());
        referral.extend_from_slice(&1u16.to_be_bytes());
        referral.extend_from_slice(&1u16.to_be_bytes());
        push_record(&mut referral, "example.com", 2, &encode_name("ns1.example.com").unwrap());
        push_record(&mut referral, "ns1.example.com", 1, &[9, 9, 9, 9]);

        // Second reply, from the glue address: direct answer.
        let mut answer = response_header(1, 1, 0, 0);
        answer.extend_from_slice(&encode_name("www.example.com").unwrap());
        answer.extend_from_slice(&1u16.to_be_bytes());
        answer.extend_from_slice(&1u16.to_be_bytes());
        push_record(&mut answer, "www.example.com", 1, &[1, 2, 3, 4]);

        let transport = ScriptedTransport::new(vec![
            Scripted::Reply(referral),
            Scripted::Reply(answer),
        ]);
        let mut ids = FixedId(1);
        let mut resolver = Resolver {
            transport: &transport,
            ids: &mut ids,
            root_servers: vec![Ipv4Addr::new(198, 41, 0, 4)],
            effective_tld: &always_has_tld,
        };

        let result = resolver.resolve("www.example.com", &[Ipv4Addr::new(198, 41, 0, 4)], false);
        assert_eq!(result, Some("1.2.3.4".to_string()));

        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].1, vec![Ipv4Addr::new(9, 9, 9, 9)]);
    }
}
