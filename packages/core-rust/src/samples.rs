//! Example request bodies, one per event, shown on the endpoint's index page.
//!
//! The push and pull-request samples follow the service hook payloads Team
//! Services sends. Each sample is accepted by its event's validation.

/// Sample body for `ping`.
pub const PING: &str = r#"{
    "message": "Hello, world!"
}"#;

/// Sample body for `gitCodePushed` (a `git.push` service hook notification).
pub const GIT_CODE_PUSHED: &str = r#"{
    "subscriptionId": "00000000-0000-0000-0000-000000000000",
    "notificationId": 1,
    "id": "03c164c2-8912-4d5e-8009-3707d5f83734",
    "eventType": "git.push",
    "publisherId": "tfs",
    "message": {
        "text": "Jamal Hartnett pushed updates to branch master of repository Fabrikam-Fiber-Git.",
        "html": "Jamal Hartnett pushed updates to branch master of repository <a href=\"https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/_git/Fabrikam-Fiber-Git\">Fabrikam-Fiber-Git</a>."
    },
    "resource": {
        "commits": [
            {
                "commitId": "33b55f7cb7e7e245323987634f960cf4a6e6bc74",
                "author": {
                    "name": "Jamal Hartnett",
                    "email": "fabrikamfiber4@hotmail.com",
                    "date": "2015-02-25T19:01:00Z"
                },
                "comment": "Fixed bug in web.config file & bumped version"
            }
        ],
        "refUpdates": [
            {
                "name": "refs/heads/master",
                "oldObjectId": "aad331d8d3b131fa9ae03cf5e53965b51942618a",
                "newObjectId": "33b55f7cb7e7e245323987634f960cf4a6e6bc74"
            }
        ],
        "repository": {
            "id": "278d5cd2-584d-4b63-824a-2ba458937249",
            "name": "Fabrikam-Fiber-Git",
            "url": "https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/_apis/git/repositories/278d5cd2-584d-4b63-824a-2ba458937249",
            "project": {
                "id": "6ce954b1-ce1f-45d1-b94d-e6bf2464ba2c",
                "name": "Fabrikam-Fiber-Git",
                "state": "wellFormed"
            },
            "defaultBranch": "refs/heads/master",
            "remoteUrl": "https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/_git/Fabrikam-Fiber-Git"
        },
        "pushedBy": {
            "id": "00067FFED5C7AF52@Live.com",
            "displayName": "Jamal Hartnett",
            "uniqueName": "Windows Live ID\\fabrikamfiber4@hotmail.com"
        },
        "pushId": 14,
        "date": "2014-05-02T19:17:13.3309587Z"
    },
    "createdDate": "2016-08-19T18:44:49.6217252Z"
}"#;

/// Sample body for `gitPush` (arguments posted directly, no envelope).
pub const GIT_PUSH: &str = r#"{
    "collectionUri": "https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/",
    "repoUri": "https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/_git/Fabrikam-Fiber-Git",
    "projectId": "Fabrikam-Fiber-Git",
    "repoId": "Fabrikam-Fiber-Git",
    "commit": "33b55f7cb7e7e245323987634f960cf4a6e6bc74",
    "pushedBy": "Jamal Hartnett",
    "targetBranch": "master"
}"#;

/// Sample body for `pullRequestMergeCommitCreated`.
pub const PULL_REQUEST_MERGE_COMMIT_CREATED: &str = r#"{
    "subscriptionId": "00000000-0000-0000-0000-000000000000",
    "notificationId": 2,
    "id": "6872ee8c-b333-4eff-bfb9-0d5274943566",
    "eventType": "git.pullrequest.merged",
    "publisherId": "tfs",
    "message": {
        "text": "Jamal Hartnett has created a pull request merge commit",
        "html": "Jamal Hartnett has created a pull request merge commit for <a href=\"https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/_git/Fabrikam-Fiber-Git/pullrequest/1\">pull request 1</a> & is waiting for a build."
    },
    "resource": {
        "repository": {
            "id": "4bc14d40-c903-45e2-872e-0462c7748079",
            "name": "Fabrikam-Fiber-Git",
            "url": "https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/_apis/git/repositories/4bc14d40-c903-45e2-872e-0462c7748079",
            "project": {
                "id": "6ce954b1-ce1f-45d1-b94d-e6bf2464ba2c",
                "name": "Fabrikam-Fiber-Git",
                "state": "wellFormed"
            },
            "remoteUrl": "https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/_git/Fabrikam-Fiber-Git"
        },
        "pullRequestId": 1,
        "status": "active",
        "createdBy": {
            "id": "54d125f7-69f7-4191-904f-c5b96b6261c8",
            "displayName": "Jamal Hartnett",
            "uniqueName": "fabrikamfiber4@hotmail.com"
        },
        "creationDate": "2014-06-17T16:55:46.589889Z",
        "title": "my first pull request",
        "description": " - test2\r\n",
        "sourceRefName": "refs/heads/mytopic",
        "targetRefName": "refs/heads/master",
        "mergeStatus": "succeeded",
        "mergeId": "a10bb228-6ba6-4362-abd7-49ea21333dbd",
        "lastMergeSourceCommit": {
            "commitId": "53d54ac915144006c2c9e90d2c7d3880920db49c"
        },
        "lastMergeTargetCommit": {
            "commitId": "a511f535b1ea495ee0c903badb68fbc83772c882"
        },
        "lastMergeCommit": {
            "commitId": "eef717f69257a6333f221566c1c987dc94cc0d72"
        }
    },
    "createdDate": "2016-08-19T18:44:49.6217252Z"
}"#;
